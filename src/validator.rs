//
// validator.rs: MVM table legality checks
//
// A table is a legal MVM mapping when one of the B (activation) and D
// (weight) vectors puts all 576 rows on a single table row, and the
// other vector spreads exactly 576 rows across the table. Every row
// with D > 0 also needs a parseable WT1 spec.
//
// Validation is a pure function of the snapshot, cheap enough to run
// after every edit.
//

use tracing::{debug, info};

use crate::errors::ErrorCode;
use crate::table::Snapshot;
use crate::wt1;

// Total number of physical rows an MVM operation spans.
pub const TOTAL: i64 = 576;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    // B on a single row, D distributed: each table row carries its own
    // weights against a shared activation.
    DifferingWeights,
    // D on a single row, B distributed.
    DifferingActivation,
    Invalid,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::DifferingWeights => "differing weights (D distributed)",
            Mode::DifferingActivation => "differing activation (B distributed)",
            Mode::Invalid => "invalid",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    // Which distribution rule held, independent of the WT1 outcome.
    pub mode: Mode,
    // Widened so that sixteen i64 counts cannot overflow.
    pub sum_b: i128,
    pub sum_d: i128,
    // Valid and at least one row has a usable WT1 spec, so there is
    // something to plan.
    pub any_wt1: bool,
    // Why the table is not valid. None when valid.
    pub reason: Option<ErrorCode>,
}

impl Validation {
    pub fn plannable(&self) -> bool {
        self.valid && self.any_wt1
    }

    pub fn status(&self) -> String {
        match &self.reason {
            None => String::from("OK"),
            Some(code) => format!("Invalid: {}", code),
        }
    }
}

// Exactly one entry is TOTAL and every other entry is exactly 0.
pub fn is_single_576(v: &[i64]) -> bool {
    v.iter().filter(|x| **x == TOTAL).count() == 1 && v.iter().all(|x| *x == TOTAL || *x == 0)
}

// Check every row with D > 0 has a WT1 spec that parses. Reports the
// first offending row.
fn check_wt1(snapshot: &Snapshot) -> Result<(), ErrorCode> {
    for (row, entry) in snapshot.rows().iter().enumerate() {
        if entry.d() <= 0 {
            continue;
        }
        match wt1::parse(&entry.wt1_spec) {
            Ok(Some(_)) => (),
            Ok(None) => return Err(ErrorCode::MissingWt1 { row }),
            Err(cause) => {
                return Err(ErrorCode::BadWt1 {
                    row,
                    cause: Box::new(cause),
                })
            }
        }
    }
    Ok(())
}

fn sum(v: &[i64]) -> i128 {
    v.iter().map(|x| i128::from(*x)).sum()
}

fn any_wt1(snapshot: &Snapshot) -> bool {
    snapshot
        .rows()
        .iter()
        .any(|entry| matches!(wt1::parse(&entry.wt1_spec), Ok(Some(_))))
}

pub fn validate(snapshot: &Snapshot) -> Validation {
    let b = snapshot.b();
    let d = snapshot.d();
    let sum_b = sum(&b);
    let sum_d = sum(&d);

    // If both hold at once, differing weights wins.
    let total = i128::from(TOTAL);
    let mode = if sum_d == total && is_single_576(&b) {
        Mode::DifferingWeights
    } else if sum_b == total && is_single_576(&d) {
        Mode::DifferingActivation
    } else {
        Mode::Invalid
    };

    let wt1_res = check_wt1(snapshot);
    debug!("sum B = {}, sum D = {}, mode = {:?}, wt1 = {:?}", sum_b, sum_d, mode, wt1_res);

    let reason = if mode == Mode::Invalid {
        Some(ErrorCode::BadDistribution { sum_b, sum_d })
    } else {
        wt1_res.err()
    };
    let valid = reason.is_none();

    let res = Validation {
        valid,
        mode,
        sum_b,
        sum_d,
        any_wt1: valid && any_wt1(snapshot),
        reason,
    };
    info!("MVM table: {}", res.status());
    res
}
