//! Command-line interface for the tabi itinerary engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod optimize;

pub use error::CliError;
use optimize::{OptimizeArgs, run_optimize};

const ARG_OPTIMIZE_REQUEST: &str = "request";
const ENV_OPTIMIZE_REQUEST: &str = "TABI_CMDS_OPTIMIZE_REQUEST_PATH";
const ARG_RAIN_PROBABILITY: &str = "rain-probability";
const ARG_ANTS: &str = "ants";
const ARG_ITERATIONS: &str = "iterations";
const ARG_TIME_BUDGET_MS: &str = "time-budget-ms";
const ARG_SEED: &str = "seed";

/// Run the tabi CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration, the request file or
/// the optimizer fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse()?;
    match cli.command {
        Command::Optimize(args) => run_optimize(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "tabi",
    about = "Order a day's sightseeing stops into an efficient itinerary",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Optimize the visiting order of a JSON request.
    Optimize(OptimizeArgs),
}

#[cfg(test)]
mod tests;
