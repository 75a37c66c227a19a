//
// table.rs: The MVM configuration table
//
// The table has one row per physical MVM row, and each row holds the
// raw text the user typed into its five cells. Nothing is parsed on
// entry: numeric cells are read leniently when validating, and WT1
// cells are parsed by wt1::parse when needed.
//

use crate::errors::ErrorCode;

// Number of MVM rows.
pub const NUM_ROWS: usize = 16;

// The columns of the table, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    // ACT VAL
    ActCount,
    // No rows (ACT), vector B
    NoRowsAct,
    // WT VAL (WT0)
    WtCount,
    // No rows (WT0), vector D
    NoRowsWt0,
    // WT1 (ADC weights)
    Wt1Spec,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::ActCount,
        Column::NoRowsAct,
        Column::WtCount,
        Column::NoRowsWt0,
        Column::Wt1Spec,
    ];

    pub fn from_index(index: usize) -> Option<Column> {
        Column::ALL.get(index).copied()
    }

    pub fn header(&self) -> &'static str {
        match self {
            Column::ActCount => "ACT VAL",
            Column::NoRowsAct => "No rows (ACT)",
            Column::WtCount => "WT VAL (WT0)",
            Column::NoRowsWt0 => "No rows (WT0)",
            Column::Wt1Spec => "WT1 (ADC weights)",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MvmRow {
    pub act_count: String,
    pub no_rows_act: String,
    pub wt_count: String,
    pub no_rows_wt0: String,
    pub wt1_spec: String,
}

impl MvmRow {
    fn cell_mut(&mut self, column: Column) -> &mut String {
        match column {
            Column::ActCount => &mut self.act_count,
            Column::NoRowsAct => &mut self.no_rows_act,
            Column::WtCount => &mut self.wt_count,
            Column::NoRowsWt0 => &mut self.no_rows_wt0,
            Column::Wt1Spec => &mut self.wt1_spec,
        }
    }

    pub fn cell(&self, column: Column) -> &str {
        match column {
            Column::ActCount => &self.act_count,
            Column::NoRowsAct => &self.no_rows_act,
            Column::WtCount => &self.wt_count,
            Column::NoRowsWt0 => &self.no_rows_wt0,
            Column::Wt1Spec => &self.wt1_spec,
        }
    }

    // Activation distribution count.
    pub fn b(&self) -> i64 {
        count(&self.no_rows_act)
    }

    // Weight distribution count.
    pub fn d(&self) -> i64 {
        count(&self.no_rows_wt0)
    }
}

// Lenient integer read for numeric cells: anything that isn't a
// decimal integer counts as 0.
pub fn count(text: &str) -> i64 {
    text.trim().parse::<i64>().unwrap_or(0)
}

// The editable table.
#[derive(Clone, Debug, Default)]
pub struct MvmTable {
    rows: [MvmRow; NUM_ROWS],
}

impl MvmTable {
    pub fn new() -> Self {
        Self::default()
    }

    // Store the raw text of one cell. Only the row index can be wrong;
    // the text itself is never rejected.
    pub fn set_cell(&mut self, row: usize, column: Column, text: &str) -> Result<(), ErrorCode> {
        let cell = self
            .rows
            .get_mut(row)
            .ok_or(ErrorCode::BadRow { row })?
            .cell_mut(column);
        cell.clear();
        cell.push_str(text);
        Ok(())
    }

    pub fn row(&self, row: usize) -> Option<&MvmRow> {
        self.rows.get(row)
    }

    pub fn clear(&mut self) {
        self.rows = Default::default();
    }

    // An owned copy of the table for validation and planning, so that
    // later edits can't be observed half-way through.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rows: self.rows.clone(),
        }
    }
}

// Immutable copy of the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    rows: [MvmRow; NUM_ROWS],
}

impl Snapshot {
    pub fn rows(&self) -> &[MvmRow] {
        &self.rows
    }

    // Vector B.
    pub fn b(&self) -> [i64; NUM_ROWS] {
        let mut v = [0; NUM_ROWS];
        for (x, row) in v.iter_mut().zip(self.rows.iter()) {
            *x = row.b();
        }
        v
    }

    // Vector D.
    pub fn d(&self) -> [i64; NUM_ROWS] {
        let mut v = [0; NUM_ROWS];
        for (x, row) in v.iter_mut().zip(self.rows.iter()) {
            *x = row.d();
        }
        v
    }
}
