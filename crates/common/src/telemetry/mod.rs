//! Tracing subscriber setup
//!
//! `RUST_LOG` wins when set; otherwise the configured log level applies.

use crate::config::ObservabilityConfig;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let result = if config.json_logging {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .try_init()
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init()
    };

    if result.is_ok() {
        tracing::debug!(service = %config.service_name, "Tracing initialized");
    }
}
