//
// parser.rs: Reader for .mvm table files
//
// The file is line-based, with ';' starting a comment:
//
//   CIMA 5                       ; target index, default 0
//   MASK 64'h0000_0000_0000_00FF ; optional, overrides CIMA
//   ; row act  B    wt0 D    WT1
//   0     1    576  -   -
//   3     -    -    1   200  c0=5, c1=2
//
// A row line has five whitespace-separated fields, with '-' for an
// empty cell. The rest of the line is the WT1 cell.
//

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::errors::{at_line, Error, ErrorCode, FileErrorKind};
use crate::table::{Column, MvmTable, NUM_ROWS};
use crate::target::{self, CimaMask};
use crate::wt1;

// Everything read from a table file.
#[derive(Clone, Debug)]
pub struct Content {
    pub table: MvmTable,
    pub index: u64,
    pub mask_text: String,
    // Resolved write target, from the mask if given, else the index.
    pub target: CimaMask,
}

// Numeric columns, in file order.
const NUMERIC_COLUMNS: [Column; 4] = [
    Column::ActCount,
    Column::NoRowsAct,
    Column::WtCount,
    Column::NoRowsWt0,
];

fn remove_comment((s, line): (&str, u32)) -> (&str, u32) {
    (
        match s.find(';') {
            Some(i) => &s[..i],
            None => s,
        },
        line,
    )
}

// Split off the first whitespace-delimited word.
fn next_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(i) => Some((&s[..i], &s[i..])),
        None => Some((s, "")),
    }
}

fn cell_text(field: &str) -> &str {
    if field == "-" {
        ""
    } else {
        field
    }
}

// Reads lines into a table, tracking which rows and directives we've
// already seen.
struct Reader {
    table: MvmTable,
    rows_seen: HashSet<usize>,
    index: Option<u64>,
    mask_text: Option<String>,
}

impl Reader {
    fn new() -> Self {
        Reader {
            table: MvmTable::new(),
            rows_seen: HashSet::new(),
            index: None,
            mask_text: None,
        }
    }

    fn parse_line(&mut self, s: &str) -> Result<(), ErrorCode> {
        let (first, rest) = match next_word(s) {
            Some(x) => x,
            None => return Ok(()),
        };

        match first.to_ascii_uppercase().as_str() {
            "CIMA" => {
                if self.index.is_some() {
                    return Err(ErrorCode::RepeatedDirective { name: "CIMA" });
                }
                let value = rest.trim();
                if value.is_empty() {
                    return Err(ErrorCode::MissingValue { name: "CIMA" });
                }
                let index = wt1::parse_int(value)?;
                // Check the range now, so the error has a line number.
                CimaMask::from_index(index)?;
                self.index = Some(index);
                Ok(())
            }
            "MASK" => {
                if self.mask_text.is_some() {
                    return Err(ErrorCode::RepeatedDirective { name: "MASK" });
                }
                let value = rest.trim();
                if value.is_empty() {
                    return Err(ErrorCode::MissingValue { name: "MASK" });
                }
                target::parse_mask(value)?;
                self.mask_text = Some(value.to_string());
                Ok(())
            }
            _ if first.starts_with(|c: char| c.is_ascii_digit()) => self.parse_row(first, rest),
            _ => Err(ErrorCode::UnknownDirective {
                name: first.to_string(),
            }),
        }
    }

    fn parse_row(&mut self, first: &str, mut rest: &str) -> Result<(), ErrorCode> {
        let row = first.parse::<usize>().map_err(|_| ErrorCode::BadNumber {
            text: first.to_string(),
        })?;
        if row >= NUM_ROWS {
            return Err(ErrorCode::BadRow { row });
        }
        if !self.rows_seen.insert(row) {
            return Err(ErrorCode::RepeatedRow { row });
        }

        for column in NUMERIC_COLUMNS.iter() {
            let (field, tail) = next_word(rest).ok_or(ErrorCode::MissingColumns)?;
            self.table.set_cell(row, *column, cell_text(field))?;
            rest = tail;
        }
        self.table.set_cell(row, Column::Wt1Spec, rest.trim())
    }

    fn finish(self) -> Result<Content, ErrorCode> {
        let index = self.index.unwrap_or(0);
        let mask_text = self.mask_text.unwrap_or_default();
        let target = target::resolve(&mask_text, index)?;
        Ok(Content {
            table: self.table,
            index,
            mask_text,
            target,
        })
    }
}

pub fn parse_str(data: &str) -> Result<Content, Error> {
    let mut reader = Reader::new();

    let line_iter = data
        .lines()
        .zip(1..)
        .map(remove_comment)
        .map(|(s, i)| (s.trim(), i))
        .filter(|(s, _)| !s.is_empty());

    for (s, line) in line_iter {
        at_line(line, reader.parse_line(s))?;
    }

    // Directive values were checked as they were read.
    at_line(0, reader.finish())
}

pub fn parse<P: AsRef<Path>>(file_name: P) -> Result<Content, FileErrorKind> {
    let data = fs::read_to_string(file_name)?;
    Ok(parse_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_and_directives() {
        let content = parse_str(
            "; scenario\n\
             CIMA 5\n\
             0 1 576 - -\n\
             3 - - 1 200 c0=5, c1=2 ; trailing comment\n\
             7 - - 1 376   7 5 3 1  \n",
        )
        .unwrap();

        assert_eq!(content.index, 5);
        assert_eq!(content.target, CimaMask(1 << 5));
        assert_eq!(content.mask_text, "");

        let table = &content.table;
        assert_eq!(table.row(0).unwrap().cell(Column::ActCount), "1");
        assert_eq!(table.row(0).unwrap().b(), 576);
        assert_eq!(table.row(0).unwrap().cell(Column::NoRowsWt0), "");
        assert_eq!(table.row(3).unwrap().cell(Column::Wt1Spec), "c0=5, c1=2");
        assert_eq!(table.row(7).unwrap().cell(Column::Wt1Spec), "7 5 3 1");
        assert_eq!(table.row(7).unwrap().d(), 376);
        assert_eq!(table.row(1), Some(&Default::default()));
    }

    #[test]
    fn mask_overrides_index() {
        let content = parse_str("cima 2\nMASK 0xF0\n").unwrap();
        assert_eq!(content.target, CimaMask(0xf0));
        assert_eq!(content.mask_text, "0xF0");
    }

    fn error_at(data: &str) -> (u32, ErrorCode) {
        let err = parse_str(data).unwrap_err();
        (err.line, err.code)
    }

    #[test]
    fn errors_carry_line_numbers() {
        assert_eq!(error_at("\n\n16 0 0 0 0\n"), (3, ErrorCode::BadRow { row: 16 }));
        assert_eq!(
            error_at("1 0 0 0 0\n1 0 0 0 0\n"),
            (2, ErrorCode::RepeatedRow { row: 1 })
        );
        assert_eq!(error_at("; c\n2 0 0 0\n"), (2, ErrorCode::MissingColumns));
        assert_eq!(error_at("CIMA 64\n"), (1, ErrorCode::BadTargetIndex { index: 64 }));
        assert_eq!(
            error_at("CIMA 1\nCIMA 2\n"),
            (2, ErrorCode::RepeatedDirective { name: "CIMA" })
        );
        assert_eq!(error_at("MASK\n"), (1, ErrorCode::MissingValue { name: "MASK" }));
        assert_eq!(
            error_at("WEIGHTS 3\n"),
            (1, ErrorCode::UnknownDirective { name: String::from("WEIGHTS") })
        );
        assert!(matches!(error_at("MASK 64'hXYZ\n"), (1, ErrorCode::BadMask { .. })));
    }

    #[test]
    fn numeric_cells_are_not_checked() {
        let content = parse_str("4 x y z w\n").unwrap();
        let row = content.table.row(4).unwrap();
        assert_eq!(row.cell(Column::NoRowsAct), "y");
        assert_eq!(row.b(), 0);
        assert_eq!(row.cell(Column::Wt1Spec), "");
    }
}
