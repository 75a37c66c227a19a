//
// lib.rs: The cimamvm library.
//
// cimamvm checks a CIMA matrix-vector-multiply configuration table:
// whether the B (activation) and D (weight) distributions form a legal
// mapping, and if so, which ADC channel weight writes implement the
// table's WT1 specs, and which CIMA instances the writes go to.
//
// The cimamvm binary is a thin wrapper around "check", which reads a
// .mvm table file. Callers driving the table interactively should use
// table::MvmTable directly, running validator::validate after each
// edit and planner::plan once the table is plannable.
//

pub mod catalog;
pub mod errors;
pub mod parser;
pub mod planner;
pub mod table;
pub mod target;
pub mod validator;
pub mod writer;
pub mod wt1;

use tracing::info;

use errors::FileErrorKind;

// What a successful check produced, for status reporting.
#[derive(Clone, Debug)]
pub struct Report {
    pub target: target::CimaMask,
    pub validation: validator::Validation,
    pub plan: planner::WritePlan,
}

pub fn check(file_name: &str, config: &writer::Config) -> Result<Report, errors::FileError> {
    (|| -> Result<Report, FileErrorKind> {
        let content = parser::parse(file_name)?;
        let snapshot = content.table.snapshot();

        let validation = validator::validate(&snapshot);
        if let Some(reason) = &validation.reason {
            return Err(FileErrorKind::Check(reason.clone()));
        }

        let plan = planner::plan(&snapshot, validation.mode).map_err(FileErrorKind::Check)?;
        info!(
            "{}: {} writes over {} channels",
            file_name,
            plan.len(),
            plan.channels().count()
        );

        writer::write_files(
            file_name,
            config,
            content.index,
            content.target,
            &snapshot,
            &validation,
            &plan,
        )?;

        Ok(Report {
            target: content.target,
            validation,
            plan,
        })
    })()
    .map_err(|err| errors::FileError {
        file: file_name.into(),
        err,
    })
}
