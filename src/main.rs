//
// main.rs: Entry point for the cimamvm binary.
//
// Three subcommands: 'check' validates and plans a .mvm table file,
// 'target' resolves a CIMA mask or index, and 'registers' lists the
// register catalog.
//

use anyhow::{anyhow, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use itertools::Itertools;
use tracing_subscriber::EnvFilter;

use std::process;

use cimamvm::{catalog, target, wt1, writer};

fn run_check(matches: &ArgMatches) -> Result<()> {
    let file_name = matches.value_of("INPUT.mvm").unwrap_or_default();

    let config = writer::Config {
        gen_plan: !matches.is_present("noplan"),
        gen_summary: !matches.is_present("nosummary"),
    };

    let report = cimamvm::check(file_name, &config)?;
    println!(
        "CIMA {} ({}); mode {}; {} writes on {} channels",
        report.target,
        writer::units(report.target),
        report.validation.mode.name(),
        report.plan.len(),
        report.plan.channels().count()
    );
    Ok(())
}

fn run_target(matches: &ArgMatches) -> Result<()> {
    let index = wt1::parse_int(matches.value_of("index").unwrap_or("0"))
        .map_err(|e| anyhow!("Invalid index: {}", e))?;
    let mask = target::resolve(matches.value_of("mask").unwrap_or(""), index)?;

    println!("{}", mask);
    println!("{}: {}", writer::units(mask), mask.units().join(" "));
    Ok(())
}

fn run_registers(matches: &ArgMatches) -> Result<()> {
    let function = match matches.value_of("function") {
        Some(name) => Some(
            catalog::Function::from_name(name).ok_or_else(|| anyhow!("Unknown function '{}'", name))?,
        ),
        None => None,
    };

    for reg in catalog::registers() {
        if function.map_or(true, |f| f == reg.function) {
            println!(
                "{:<26} {:<8} {:>2} bits  default {}",
                reg.name,
                reg.function,
                reg.width(),
                reg.default_value
            );
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let matches = App::new("cimamvm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("CIMA MVM table validator and write planner")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("check")
                .about("Validate a .mvm table and write its plan and summary")
                .arg(
                    Arg::with_name("INPUT.mvm")
                        .help("Input file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("noplan")
                        .short("p")
                        .long("noplan")
                        .takes_value(false)
                        .help("Disable .plan file output"),
                )
                .arg(
                    Arg::with_name("nosummary")
                        .short("s")
                        .long("nosummary")
                        .takes_value(false)
                        .help("Disable .sum file output"),
                ),
        )
        .subcommand(
            SubCommand::with_name("target")
                .about("Resolve the CIMA instances a write addresses")
                .arg(
                    Arg::with_name("mask")
                        .short("m")
                        .long("mask")
                        .takes_value(true)
                        .help("Explicit mask: 64'h..., 0x... or bare hex"),
                )
                .arg(
                    Arg::with_name("index")
                        .short("i")
                        .long("index")
                        .takes_value(true)
                        .help("CIMA index (0-63), used when no mask is given"),
                ),
        )
        .subcommand(
            SubCommand::with_name("registers")
                .about("List the register catalog")
                .arg(
                    Arg::with_name("function")
                        .short("f")
                        .long("function")
                        .takes_value(true)
                        .help("Only list registers of this function class"),
                ),
        )
        .get_matches();

    let res = match matches.subcommand() {
        ("check", Some(sub)) => run_check(sub),
        ("target", Some(sub)) => run_target(sub),
        ("registers", Some(sub)) => run_registers(sub),
        _ => Err(anyhow!("No subcommand given")),
    };

    if let Err(e) = res {
        eprintln!("{}", e);
        process::exit(1);
    }
}
