//! Tracing subscriber setup for the binary.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Raised when a global subscriber is already installed or the filter is
/// malformed.
#[derive(Debug, Error, Eq, PartialEq)]
#[error("failed to initialise logging: {0}")]
pub struct LoggingError(String);

/// Builds the event filter. `RUST_LOG` wins over `default_level`; an
/// unparsable level falls back to `info`.
#[must_use]
pub fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level.trim()))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a compact fmt subscriber that writes to stderr, keeping stdout
/// free for command output.
///
/// # Errors
///
/// Returns [`LoggingError`] when a global subscriber is already set.
pub fn init(default_level: &str) -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| LoggingError(err.to_string()))
}
