//! Subscriber setup for binaries.
//!
//! `RUST_LOG` takes precedence over the level passed in, so a user can
//! always narrow output to one target (`RUST_LOG=taskforge::print=info`).

use taskforge_foundation::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber writing to stderr.
///
/// # Errors
///
/// Returns an error if `level` is not a valid filter directive or a global
/// subscriber is already installed.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| Error::internal(format!("invalid log filter '{level}': {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| Error::internal(format!("failed to install logger: {e}")))
}
