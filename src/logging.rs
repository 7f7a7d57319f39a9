//! Tracing initialization for hosts and tests
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is the host's call. These helpers cover the common setups.

use tracing_subscriber::EnvFilter;

type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install a console subscriber honoring `RUST_LOG`, defaulting to `info`.
/// Fails when a global subscriber is already set.
pub fn init() -> Result<(), InitError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .try_init()
}

/// JSON variant for log-shipping hosts.
pub fn init_json() -> Result<(), InitError> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .try_init()
}
