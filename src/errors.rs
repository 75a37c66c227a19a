//
// errors.rs: Error codes
//
// Every recoverable failure in the crate is an ErrorCode. Codes that
// come from reading a table file get wrapped in an Error carrying the
// line number, and the library entry point wraps that again with the
// file name.
//
// Validation failures are reported through the same codes, but as
// data on the Validation result rather than as an Err.
//

use thiserror::Error;

#[derive(Clone, Debug, Error)]
#[error("Error in line {}: {}", line, code)]
pub struct Error {
    pub code: ErrorCode,
    pub line: u32,
}

#[derive(Debug, Error)]
#[error("Error in {}: {}", file, err)]
pub struct FileError {
    pub file: String,
    #[source]
    pub err: FileErrorKind,
}

#[derive(Debug, Error)]
pub enum FileErrorKind {
    #[error(transparent)]
    Parse(#[from] Error),
    #[error("{0}")]
    Check(ErrorCode),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErrorCode {
    // ChannelSpecParser
    #[error("bad number '{text}'")]
    BadNumber { text: String },
    #[error("value {value} out of range (0..15)")]
    ValueOutOfRange { value: u64 },
    #[error("malformed channel assignment '{token}'")]
    BadChannelToken { token: String },
    #[error("empty channel list")]
    EmptyList,

    // CimaTargetResolver
    #[error("invalid mask '{text}'")]
    BadMask { text: String },
    #[error("mask '{text}' is wider than 64 bits")]
    MaskTooWide { text: String },
    #[error("CIMA index {index} out of range (0..63)")]
    BadTargetIndex { index: u64 },

    // MvmTableModel
    #[error("row {row} out of range (0..15)")]
    BadRow { row: usize },

    // MvmConfigValidator
    #[error("needs total 576 in exactly one row of B or D (the other distributed to 576); got Sum B = {sum_b}, Sum D = {sum_d}")]
    BadDistribution { sum_b: i128, sum_d: i128 },
    #[error("WT1 required when D > 0 (row {row})")]
    MissingWt1 { row: usize },
    #[error("invalid WT1 spec at row {row}: {cause}")]
    BadWt1 { row: usize, cause: Box<ErrorCode> },

    // MvmWritePlanner
    #[error("nothing to write: no active row has a usable WT1 spec")]
    NothingToWrite,

    // Table file reader
    #[error("unknown directive '{name}'")]
    UnknownDirective { name: String },
    #[error("{name} given more than once")]
    RepeatedDirective { name: &'static str },
    #[error("{name} expects a value")]
    MissingValue { name: &'static str },
    #[error("row line needs at least 5 fields (row, act, B, wt0, D)")]
    MissingColumns,
    #[error("row {row} defined twice")]
    RepeatedRow { row: usize },
}

// Adapt an ErrorCode to an Error.
pub fn at_line<Val>(line: u32, res: Result<Val, ErrorCode>) -> Result<Val, Error> {
    res.map_err(|e| Error { code: e, line })
}
