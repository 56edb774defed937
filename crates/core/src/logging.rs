//! Structured logging infrastructure for Sentinel.
//!
//! A single entry point installs the global `tracing` subscriber with either
//! human-readable or JSON output, filtered by `RUST_LOG` or the configured level.

use crate::config::LogFormat;
use crate::error::{CoreError, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a subscriber with the given default level and format.
///
/// `RUST_LOG` still takes precedence over `level`. Fails instead of panicking
/// when a global subscriber is already installed. Output goes to stderr so
/// stdout stays free for protocol traffic.
pub fn try_init_with(level: &str, format: LogFormat) -> Result<()> {
    let filter = build_filter(level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init(),
    };

    installed.map_err(|e| CoreError::Logging(e.to_string()))
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| CoreError::Logging(format!("invalid log level '{}': {}", level, e))),
    }
}
