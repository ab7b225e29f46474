//! Configuration module for the backtest explorer.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation for the explorer session and the demo binary.
//!
//! # Usage
//!
//! ```rust,ignore
//! use backtest_explorer::config::load_config;
//!
//! // Load from default path (backtest-explorer.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/explorer.yaml"))?;
//!
//! println!("data folder: {}", config.data.folder);
//! ```

mod data;
mod display;
mod observability;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use data::{CacheConfig, DataConfig};
pub use display::{DisplayConfig, PresetsConfig};
pub use observability::{LogFormat, LoggingConfig, ObservabilityConfig};

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "backtest-explorer.yaml";

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

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Data source configuration.
    #[serde(default)]
    pub data: DataConfig,
    /// Display defaults.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Preset sizes.
    #[serde(default)]
    pub presets: PresetsConfig,
    /// View cache configuration.
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
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to [`DEFAULT_CONFIG_PATH`].
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<ExplorerConfig, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<ExplorerConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: ExplorerConfig = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. Unset or empty
/// variables without a default become the empty string.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match cap.get(1).map(|m| std::env::var(m.as_str())) {
            Some(Ok(v)) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &ExplorerConfig) -> Result<(), ConfigError> {
    if config.data.folder.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "data.folder must not be empty".to_string(),
        ));
    }

    if config.data.extension.trim().is_empty() || config.data.extension.starts_with('.') {
        return Err(ConfigError::ValidationError(
            "data.extension must be a bare extension such as 'json'".to_string(),
        ));
    }

    let display = &config.display;
    if display.min_rows_bound == 0 || display.min_rows_bound > display.max_rows_bound {
        return Err(ConfigError::ValidationError(
            "display.min_rows_bound must be positive and not exceed display.max_rows_bound"
                .to_string(),
        ));
    }

    if !(display.min_rows_bound..=display.max_rows_bound).contains(&display.max_rows) {
        return Err(ConfigError::ValidationError(format!(
            "display.max_rows must be between {} and {}",
            display.min_rows_bound, display.max_rows_bound
        )));
    }

    if config.presets.top_strategies == 0 || config.presets.top_symbols == 0 {
        return Err(ConfigError::ValidationError(
            "presets.top_strategies and presets.top_symbols must be positive".to_string(),
        ));
    }

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
    use crate::settings::ChartType;

    #[test]
    fn test_default_config() {
        let config = ExplorerConfig::default();

        assert_eq!(config.data.folder, "data");
        assert_eq!(config.data.extension, "json");
        assert_eq!(config.display.max_rows, 100);
        assert_eq!(config.display.min_rows_bound, 10);
        assert_eq!(config.display.max_rows_bound, 1000);
        assert_eq!(config.presets.top_strategies, 3);
        assert_eq!(config.presets.top_symbols, 5);
        assert_eq!(config.cache.capacity, 64);
        assert_eq!(config.observability.logging.format, LogFormat::Text);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let config = match load_config_from_string("{}") {
            Ok(c) => c,
            Err(e) => panic!("should load empty config: {e}"),
        };
        assert_eq!(config.display.chart_type, ChartType::PnlByTrade);
        assert_eq!(config.display.columns.len(), 9);
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "folder: ${EXPLORER_CONFIG_TEST_NONEXISTENT_VAR:-results}";
        let result = interpolate_env_vars(input);
        assert_eq!(result, "folder: results");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        // PATH should always exist
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "level: ${EXPLORER_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        let result = interpolate_env_vars(input);
        assert_eq!(result, "level: ");
    }

    #[test]
    fn test_validation_max_rows_out_of_bounds() {
        let yaml = r"
display:
  max_rows: 5000
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for max_rows above bound");
        };
        assert!(err.to_string().contains("max_rows"));
    }

    #[test]
    fn test_validation_dotted_extension() {
        let yaml = r#"
data:
  extension: ".json"
"#;
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for dotted extension");
        };
        assert!(err.to_string().contains("extension"));
    }

    #[test]
    fn test_validation_zero_top_n() {
        let yaml = r"
presets:
  top_symbols: 0
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero top_symbols");
        };
        assert!(err.to_string().contains("top_symbols"));
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
data:
  folder: "results/2024"
  extension: "json"

display:
  chart_type: cumulative_pnl
  columns: ["symbol", "PNL"]
  max_rows: 250

presets:
  top_strategies: 2
  top_symbols: 4

cache:
  capacity: 8

observability:
  logging:
    level: "debug"
    format: "json"
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        assert_eq!(config.data.folder, "results/2024");
        assert_eq!(config.display.chart_type, ChartType::CumulativePnl);
        assert_eq!(config.display.to_options().visible_columns, vec!["symbol", "PNL"]);
        assert_eq!(config.display.max_rows, 250);
        assert_eq!(config.display.clamp_rows(5), 10);
        assert_eq!(config.presets.top_strategies, 2);
        assert_eq!(config.cache.capacity, 8);
        assert_eq!(config.observability.logging.level, "debug");
        assert_eq!(config.observability.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explorer.yaml");
        std::fs::write(&path, "cache:\n  capacity: 0\n").unwrap();

        let config = match load_config(path.to_str()) {
            Ok(c) => c,
            Err(e) => panic!("should load config file: {e}"),
        };
        assert_eq!(config.cache.capacity, 0);
    }

    #[test]
    fn test_load_missing_config_file() {
        let result = load_config(Some("/nonexistent/backtest-explorer.yaml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
