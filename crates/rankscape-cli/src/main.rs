//! Rankscape CLI
//!
//! Command-line interface for plotting and testing search sort scores.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use rankscape_cli::cli::Cli;
use rankscape_cli::commands;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::debug!(command = ?cli.command, "Starting rankscape");
    let code = commands::run(cli)?;
    Ok(code)
}
