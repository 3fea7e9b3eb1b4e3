//! netschem CLI
//!
//! Entry point for the netschem command-line tool. Compiles VPR post-synthesis
//! netlists and their SDF timing into schematic JSON documents.

mod args;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    match commands::run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", commands::failure_message(&e));
            ExitCode::FAILURE
        }
    }
}
