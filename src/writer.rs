//
// writer.rs: Output files for a checked table
//
// A table that validates and plans produces two text files next to
// the input: '.plan' with the per-channel write sequences, and '.sum'
// with the summary shown before running the MVM.
//

use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;

use itertools::Itertools;

use crate::planner::WritePlan;
use crate::table::Snapshot;
use crate::target::CimaMask;
use crate::validator::Validation;

#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub gen_plan: bool,
    pub gen_summary: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gen_plan: true,
            gen_summary: true,
        }
    }
}

// "1 unit", "4 units".
pub fn units(mask: CimaMask) -> String {
    match mask.count() {
        1 => String::from("1 unit"),
        n => format!("{} units", n),
    }
}

////////////////////////////////////////////////////////////////////////
// 'make_plan' lists the writes, one line per ADC channel.
//

pub fn make_plan(target: CimaMask, validation: &Validation, plan: &WritePlan) -> String {
    let mut buf = String::new();

    buf.push_str("; CIMA MVM write plan\n");
    buf.push_str(&format!("; target {} ({})\n", target, units(target)));
    buf.push_str(&format!("; mode {}\n\n", validation.mode.name()));

    for (channel, writes) in plan.iter() {
        let entries = writes
            .iter()
            .map(|w| format!("{}={}", w.row, w.value))
            .join(" ");
        buf.push_str(&format!("channel {}: {}\n", channel, entries));
    }

    buf
}

////////////////////////////////////////////////////////////////////////
// 'make_summary' describes the configuration as a whole.
//

pub fn make_summary(index: u64, target: CimaMask, snapshot: &Snapshot, validation: &Validation) -> String {
    let non_zero_b = snapshot.b().iter().filter(|x| **x > 0).count();
    let non_zero_d = snapshot.d().iter().filter(|x| **x > 0).count();

    let mut buf = String::new();
    buf.push_str("CIMA MVM Summary:\n\n");
    buf.push_str(&format!("Selected CIMA index: {}\n", index));
    buf.push_str(&format!("Target mask: {} ({})\n", target, units(target)));
    buf.push_str(&format!("Active mode: {}\n", validation.mode.name()));
    buf.push_str(&format!("Sum B: {}\n", validation.sum_b));
    buf.push_str(&format!("Sum D: {}\n", validation.sum_d));
    buf.push_str(&format!("Rows with non-zero B entries: {}\n", non_zero_b));
    buf.push_str(&format!("Rows with non-zero D entries: {}\n", non_zero_d));
    buf.push_str(&format!("Status: {}\n", validation.status()));
    buf
}

////////////////////////////////////////////////////////////////////////
// Main entry point for writing all the files is 'write_files'.
//

fn write_file(base: &Path, ext: &str, buf: &str) -> Result<(), Error> {
    let mut file = File::create(base.with_extension(ext))?;
    file.write_all(buf.as_bytes())?;
    Ok(())
}

pub fn write_files(
    file_name: &str,
    config: &Config,
    index: u64,
    target: CimaMask,
    snapshot: &Snapshot,
    validation: &Validation,
    plan: &WritePlan,
) -> Result<(), Error> {
    let base = Path::new(file_name);

    if config.gen_plan {
        write_file(base, "plan", &make_plan(target, validation, plan))?;
    }

    if config.gen_summary {
        write_file(base, "sum", &make_summary(index, target, snapshot, validation))?;
    }

    Ok(())
}
