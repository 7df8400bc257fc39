//! kvpipe CLI: drives a pipelined key-value workload.
//!
//! - `kvpipe run [options]` runs a workload against an in-process store and
//!   prints a summary
//! - `kvpipe usage [options]` prints the command line reproducing a workload
//!
//! Logging goes to stderr. `RUST_LOG` takes precedence over `-v`.

mod commands;
mod format;
mod parse;

use std::process;

use kvpipe_client::MemoryStore;
use kvpipe_workload::WorkloadRunner;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_report, format_usage, OutputMode};
use parse::{matches_to_action, CliAction, RunRequest};

fn main() {
    let matches = build_cli().get_matches();

    init_logging(matches.get_count("verbose"));

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let exit_code = match matches_to_action(&matches) {
        Ok(CliAction::Run(req)) => run_workload(req, output_mode),
        Ok(CliAction::Usage(config)) => {
            println!("{}", format_usage(&config, output_mode));
            0
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, output_mode));
            1
        }
    };
    process::exit(exit_code);
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_workload(req: RunRequest, mode: OutputMode) -> i32 {
    let store = MemoryStore::new(req.config.endpoint.clone());
    for key in &req.reject_writes {
        store.reject_writes_to(key.clone());
    }

    let runner = match WorkloadRunner::new(req.config) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string(), mode));
            return 1;
        }
    };

    match runner.run(|| store.pipeline()) {
        Ok(report) => {
            println!("{}", format_report(&report, mode));
            0
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string(), mode));
            1
        }
    }
}
