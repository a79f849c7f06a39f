//! Spicelet - SPICE-style Circuit Simulator
//!
//! Runs the analysis a netlist asks for on every circuit variant it defines.
//!
//! # Usage
//!
//! ```bash
//! spicelet rc.cir --format csv -v
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use spicelet_core::{
    netlist,
    report::{render, OutputFormat},
    Result,
};

/// SPICE-style circuit simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file
    #[arg(value_name = "NETLIST")]
    netlist: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Log level selected by the `-v` count.
fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the stderr logger. `RUST_LOG`, when set, refines the `-v` level.
fn init_logging(verbose: u8) {
    let _ = env_logger::Builder::new()
        .filter_level(log_level(verbose))
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

fn run(args: &Args) -> Result<bool> {
    // Parse the netlist
    let mut session = netlist::parse_file(&args.netlist)?;

    // Run every variant
    let results = session.run_all()?;

    let mut all_ok = true;
    for (variant, result) in results.iter().enumerate() {
        match result {
            Ok(result) => print!("{}", render(variant, result, args.format)),
            Err(err) => {
                eprintln!("error: {err}");
                all_ok = false;
            }
        }
    }

    Ok(all_ok)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_count_sets_level() {
        assert_eq!(log_level(0), LevelFilter::Warn);
        assert_eq!(log_level(1), LevelFilter::Info);
        assert_eq!(log_level(2), LevelFilter::Debug);
        assert_eq!(log_level(7), LevelFilter::Trace);
    }

    #[test]
    fn test_verbose_flag_parses() {
        let args = Args::try_parse_from(["spicelet", "rc.cir", "-vv"]).unwrap();
        assert_eq!(log_level(args.verbose), LevelFilter::Debug);
    }
}
