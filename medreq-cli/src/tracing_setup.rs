//! Tracing setup for the medreq CLI
//!
//! Usage:
//!   medreq --debug serve                          # Debug logging to console
//!   RUST_LOG=medreq_server=debug medreq serve     # Fine-grained log control
//!
//! `RUST_LOG` always wins over `--debug`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Default to `debug` instead of `info` when RUST_LOG is unset
    pub debug: bool,
}

impl TracingConfig {
    fn filter(&self) -> EnvFilter {
        let fallback = if self.debug { "debug" } else { "info" };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }
}

/// Install the global console subscriber.
pub fn init(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(config.debug) // Show targets in debug mode
        .compact()
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {}", err))
}
