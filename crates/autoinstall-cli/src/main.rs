//! # validate-autoinstall entry point
//!
//! Parses arguments, runs the pipeline, prints the single outcome line and
//! exits 0 or 1.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use autoinstall_cli::{run, Cli, Outcome, ValidatorConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries the verdict only; diagnostics go to stderr.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ValidatorConfig::from(&cli);
    tracing::debug!(?config, "validate-autoinstall starting");

    let outcome = Outcome::from(run(&config));
    println!("{}", outcome.message());
    ExitCode::from(outcome.exit_code())
}
