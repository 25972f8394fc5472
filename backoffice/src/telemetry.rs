//! Structured logging initialisation.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialise JSON logging filtered by `RUST_LOG`.
///
/// Safe to call more than once; repeated initialisation is logged and
/// otherwise ignored so embedding applications and tests can both call
/// it freely.
pub fn init() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}
