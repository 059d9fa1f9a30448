//! Fatal command
//!
//! Usage: reqlog fatal <MESSAGE> [--error <TEXT>]

use clap::Args;
use reqlog_logging::Logger;
use thiserror::Error;

#[derive(Debug, Args)]
pub struct FatalArgs {
    /// Message text
    pub message: String,

    /// Error text recorded in the `error` attribute
    #[arg(long)]
    pub error: Option<String>,
}

#[derive(Debug, Error)]
#[error("{0}")]
struct FatalCause(String);

/// Execute fatal command; never returns
pub fn execute(logger: &Logger, args: FatalArgs) -> ! {
    let cause = args.error.map(FatalCause);
    logger.with_component("cli").fatal(
        &args.message,
        cause.as_ref().map(|c| c as &dyn std::error::Error),
        &[],
    )
}
