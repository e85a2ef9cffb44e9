//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs the global JSON subscriber, filtered by `RUST_LOG` (default
/// `info`).
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();
}
