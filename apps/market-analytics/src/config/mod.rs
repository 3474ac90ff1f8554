//! Configuration module for market analytics.
//!
//! Loads the YAML configuration, interpolates environment variables and
//! validates every section before anything is computed.
//!
//! # Usage
//!
//! ```rust,ignore
//! use market_analytics::config::{AnalyticsConfig, load_config};
//!
//! let config = load_config("analytics.yaml")?;
//! println!("RSI window: {}", config.indicators.rsi_window);
//! ```
//!
//! Values may reference the environment with `${VAR}` or `${VAR:-default}`:
//!
//! ```yaml
//! simulation:
//!   seed: ${MC_SEED:-}
//! observability:
//!   logging:
//!     level: ${LOG_LEVEL:-info}
//! ```

mod observability;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use observability::{LogFormat, LoggingConfig, ObservabilityConfig};

use crate::indicators::IndicatorConfig;
use crate::signals::ScoringConfig;
use crate::simulation::SimulationConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Monte Carlo settings plus the switch that turns the projection off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Run the simulation as part of each analysis pass.
    pub enabled: bool,
    /// Path generation parameters.
    #[serde(flatten)]
    pub params: SimulationConfig,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            params: SimulationConfig::default(),
        }
    }
}

/// Provider response cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a fetched history stays fresh; 0 disables caching.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 15 }
    }
}

impl CacheConfig {
    /// TTL as a duration.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Indicator parameters.
    #[serde(default)]
    pub indicators: IndicatorConfig,
    /// Signal scoring thresholds and weights.
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Monte Carlo simulation.
    #[serde(default)]
    pub simulation: SimulationSettings,
    /// Provider cache.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalyticsConfig, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<AnalyticsConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: AnalyticsConfig = if interpolated.trim().is_empty() {
        AnalyticsConfig::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. An unset or empty
/// variable without a default becomes the empty string.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &AnalyticsConfig) -> Result<(), ConfigError> {
    let invalid = |section: &str, e: crate::error::AnalyticsError| {
        ConfigError::ValidationError(format!("{section}: {e}"))
    };

    config
        .indicators
        .validate()
        .map_err(|e| invalid("indicators", e))?;
    config
        .scoring
        .validate()
        .map_err(|e| invalid("scoring", e))?;
    config
        .simulation
        .params
        .validate()
        .map_err(|e| invalid("simulation", e))?;

    if config.observability.logging.level.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "observability.logging.level must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.indicators.rsi_window, 14);
        assert_eq!(config.scoring.rsi_overbought, 70.0);
        assert!(config.simulation.enabled);
        assert_eq!(config.simulation.params.paths, 50);
        assert_eq!(config.cache.ttl(), Duration::from_secs(15));
        assert_eq!(config.observability.logging.format, LogFormat::Json);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = load_config_from_string("").unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_load_partial_config() {
        let yaml = r"
indicators:
  rsi_window: 21
  rsi_smoothing: WILDER
simulation:
  enabled: false
  steps: 60
  seed: 42
observability:
  logging:
    format: compact
";
        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load partial config: {e}"),
        };
        assert_eq!(config.indicators.rsi_window, 21);
        assert_eq!(config.indicators.macd_slow, 26);
        assert!(!config.simulation.enabled);
        assert_eq!(config.simulation.params.steps, 60);
        assert_eq!(config.simulation.params.paths, 50);
        assert_eq!(config.simulation.params.seed, Some(42));
        assert_eq!(config.observability.logging.format, LogFormat::Compact);
        assert_eq!(config.observability.logging.level, "info");
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "level: ${ANALYTICS_CONFIG_TEST_NONEXISTENT_VAR:-debug}";
        assert_eq!(interpolate_env_vars(input), "level: debug");
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "seed: ${ANALYTICS_CONFIG_TEST_NONEXISTENT_VAR}";
        assert_eq!(interpolate_env_vars(input), "seed: ");
    }

    #[test]
    fn test_empty_seed_parses_as_none() {
        let yaml = "simulation:\n  seed: ${ANALYTICS_CONFIG_TEST_NONEXISTENT_VAR:-}\n";
        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.simulation.params.seed, None);
    }

    #[test]
    fn test_text_without_placeholders_untouched() {
        let input = "cost: $5 {not a var}";
        assert_eq!(interpolate_env_vars(input), input);
    }

    #[test]
    fn test_validation_rejects_inverted_macd() {
        let yaml = r"
indicators:
  macd_fast: 26
  macd_slow: 12
";
        let err = load_config_from_string(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("macd_fast"));
    }

    #[test]
    fn test_validation_rejects_zero_paths() {
        let err = load_config_from_string("simulation:\n  paths: 0\n").unwrap_err();
        assert!(err.to_string().contains("simulation"));
    }

    #[test]
    fn test_validation_rejects_unordered_thresholds() {
        let yaml = r"
scoring:
  rsi_oversold: 80
  rsi_overbought: 20
";
        assert!(load_config_from_string(yaml).is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = load_config_from_string("indicators: [not, a, map").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/nonexistent/analytics.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
