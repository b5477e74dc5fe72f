//! Diagnostic tracing.
//!
//! Progress banners, command output, and error lines go straight to
//! stdout/stderr from the CLI and executor. This module only wires up the
//! `tracing` events behind them, written to stderr.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Env var holding the filter directive. Falls back to `RUST_LOG`, then `warn`.
pub const LOG_ENV: &str = "KVMHOST_LOG";

/// Initialize the tracing subscriber: stderr, compact format.
///
/// ```bash
/// KVMHOST_LOG=kvmhost=debug kvmhost apply
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
