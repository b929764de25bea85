use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use shepherd::commands::exit_for_error;

mod cli;

use cli::{dispatch, Cli};

/// Environment variable holding the log filter (e.g. `shepherd=debug`).
const LOG_ENV: &str = "SHEPHERD_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match dispatch(cli) {
        Ok(exit) => ExitCode::from(exit.code()),
        Err(err) => {
            eprintln!("{} {err:#}", "✗".red().bold());
            ExitCode::from(exit_for_error(&err).code())
        }
    }
}
