//! Logging Setup
//!
//! Installs a `tracing-subscriber` fmt subscriber.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives; overrides the configured level
//! - `observability.logging.level`: fallback level when `RUST_LOG` is unset
//! - `observability.logging.format`: `text` or `json`
//!
//! # Usage
//!
//! ```rust,ignore
//! use backtest_explorer::config::load_config;
//! use backtest_explorer::telemetry::init_logging;
//!
//! let config = load_config(None)?;
//! init_logging(&config.observability.logging);
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Build the event filter: `RUST_LOG` first, then the configured level.
#[must_use]
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global logging subscriber.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = env_filter(config);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.include_target);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init().is_ok(),
        LogFormat::Text => builder.try_init().is_ok(),
    };

    if installed {
        tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    }
    installed
}
