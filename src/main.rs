mod cli;
mod commands;
mod error;
mod table;

use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    setup_tracing(cli.verbose);
    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", *e);
            tracing::debug!("{e:?}");
            ExitCode::FAILURE
        },
    }
}

/// Bare messages on stderr by default; `-v` adds levels, targets and spans.
fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .without_time();
    match verbose {
        0 => subscriber.with_target(false).with_level(false).init(),
        _ => subscriber.init(),
    }
}
