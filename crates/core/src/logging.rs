//! Structured logging setup for streamio consumers.
//!
//! The stream crate only emits `tracing` events; nothing is printed until the
//! application installs a subscriber, typically through one of these helpers.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{CoreError, CoreResult};

const DEFAULT_DIRECTIVE: &str = "info";

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install a human-readable subscriber.
///
/// Log level can be configured via the `RUST_LOG` environment variable.
/// If not set, defaults to `info` level. Panics if a global subscriber is
/// already installed; use [`try_init`] where that can happen.
///
/// # Example
/// ```no_run
/// use streamio_core::logging;
///
/// logging::init();
/// tracing::info!("Application started");
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_DIRECTIVE))
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .init();
}

/// Install a JSON subscriber for log aggregation.
///
/// # Example
/// ```no_run
/// use streamio_core::logging;
///
/// logging::init_json();
/// tracing::info!(component = "copier", "Copy started");
/// ```
pub fn init_json() {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_DIRECTIVE))
        .with(fmt::layer().json().with_target(true).with_thread_ids(true))
        .init();
}

/// Install a human-readable subscriber with `directive` as the fallback filter,
/// returning an error instead of panicking when one is already set.
pub fn try_init(directive: &str) -> CoreResult<()> {
    let filter = EnvFilter::try_new(directive)
        .map_err(|e| CoreError::Logging(format!("bad filter '{}': {}", directive, e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| CoreError::Logging(e.to_string()))
}
