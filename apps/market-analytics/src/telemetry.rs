//! Logging Setup
//!
//! Installs a `tracing-subscriber` fmt subscriber writing to stderr, so the
//! JSON report on stdout stays machine-readable.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives; overrides `observability.logging.level`
//! - `observability.logging.format`: `json`, `compact` or `full`
//!
//! # Usage
//!
//! ```rust,ignore
//! use market_analytics::config::LoggingConfig;
//! use market_analytics::telemetry::init_logging;
//!
//! init_logging(&LoggingConfig::default())?;
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Error returned when a global subscriber is already installed.
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Build the filter: `RUST_LOG` first, then the configured level, then `info`.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), InitError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Json => builder
            .json()
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans)
            .try_init()?,
        LogFormat::Compact => builder.compact().with_ansi(false).try_init()?,
        LogFormat::Full => builder.try_init()?,
    }

    tracing::debug!(
        level = %config.level,
        format = ?config.format,
        "Logging initialized"
    );
    Ok(())
}
