//! Command-line interface for replaying inspection-map interactions.
//!
//! The `replay` subcommand feeds a recorded sequence of map events through a
//! [`MapSession`](inspection_core::MapSession), then prints the feature
//! vector for the final selection or asks the model service to predict or
//! explain it.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod replay;

pub use error::CliError;
use replay::ReplayArgs;

pub(crate) const ARG_REPLAY_EVENTS: &str = "events";
pub(crate) const ARG_REPLAY_DOMAIN_TABLE: &str = "domain-table";
pub(crate) const ARG_REPLAY_SERVICE_URL: &str = "service-url";
pub(crate) const ARG_REPLAY_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_REPLAY_ACTION: &str = "action";
pub(crate) const ENV_REPLAY_EVENTS: &str = "INSPECTION_CMDS_REPLAY_EVENTS";

/// Run the inspection CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, when
/// inputs cannot be read, or when the requested inference fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Replay(args) => replay::run_replay(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "inspection",
    about = "Replay map interactions against the food-inspection model",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay recorded map events and act on the final selection.
    Replay(ReplayArgs),
}

#[cfg(test)]
mod tests;
