//! Process-wide `tracing` setup shared by the binary and the tests.

use tracing_subscriber::{fmt, EnvFilter};

/// Level used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Filter from `RUST_LOG`, else [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Returns `false` when one was already set,
/// so repeated calls are harmless.
pub fn init() -> bool {
    // stdout carries document data only
    fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
