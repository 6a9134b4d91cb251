//! Logging setup for pipsub.
//!
//! The engine itself only emits `tracing` events. Hosts call
//! [`init_tracing`] once at startup to route them to stderr.
//!
//! # Example
//!
//! ```no_run
//! use pipsub_core::logging::{init_tracing, LogLevel};
//!
//! init_tracing(LogLevel::Debug, true);
//! tracing::info!("ready");
//! ```

mod types;

pub use types::LogLevel;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// - Respects the RUST_LOG environment variable
/// - Falls back to `default_level`
/// - Writes to stderr so command output on stdout stays clean
///
/// Should be called once at application startup. Later calls are ignored.
pub fn init_tracing(default_level: LogLevel, show_target: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(show_target)
                .with_thread_ids(false),
        )
        .with(filter)
        .try_init();
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
