use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{CliError, Result};

/// Initialize the tracing subscriber.
///
/// Logs go to stderr so that stdout only carries command output. The level
/// comes from `RUST_LOG`, defaulting to "info", or "debug" when `verbose`.
pub fn init(verbose: bool) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_level(true)
        .compact();

    let filter_layer = if verbose {
        EnvFilter::try_new("debug")
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))
    }
    .map_err(|e| CliError::user(format!("Invalid log filter: {e}")))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| CliError::user(format!("Failed to initialise logging: {e}")))
}
