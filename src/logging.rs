//! Diagnostic logging setup.
//!
//! `RUST_LOG` wins when set; otherwise the filter from settings is used.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::DEFAULT_LOG_FILTER;

/// Build the filter from `RUST_LOG`, then `fallback`, then the default.
pub fn build_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(fallback: &str) {
    let result = tracing_subscriber::registry()
        .with(build_filter(fallback))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
    if let Err(e) = result {
        eprintln!("Logger already initialized: {}", e);
    }
}
