//! `environment-d-generator`: print the merged `environment.d` environment.

use clap::Parser;
use color_eyre::eyre::Report;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, util::TryInitError};

use environment_d::{GeneratorError, Result, load_and_print};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "ENVIRONMENT_D_GENERATOR_LOG";

/// Merges `environment.d` fragments and prints them as shell assignments.
///
/// The generator takes no arguments at all, so clap's `--help` and
/// `--version` flags are disabled and rejected like any other argument.
#[derive(Debug, Parser)]
#[command(
    name = "environment-d-generator",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let Cli {} = parse_command_line()?;
    init_logging()?;
    run().map_err(Report::from)
}

fn run() -> Result<()> {
    let stdout = std::io::stdout();
    let report = load_and_print(&mut stdout.lock())?;
    if !report.recovered.is_empty() {
        warn!(
            skipped = report.recovered.len(),
            variables = report.variables,
            "some fragments were skipped"
        );
    }
    Ok(())
}

fn parse_command_line() -> Result<Cli> {
    Cli::try_parse().map_err(|err| GeneratorError::Arguments(Box::new(err)))
}

fn init_logging() -> std::result::Result<(), TryInitError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
}
