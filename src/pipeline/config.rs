//! Pipeline configuration for the orchestrator.
//!
//! This module provides configuration options for the analysis pipeline,
//! including the quality gate threshold, visualization limits, and
//! concurrency of the analysis stage.

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration for the pipeline orchestrator.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    // Quality gate settings
    /// Minimum composite quality score (out of 100) a dataset must reach
    /// before analysis, visualization and reporting run.
    pub min_quality_score: f64,
    /// Fraction of columns treated as required when scoring completeness.
    pub required_fields_ratio: f64,

    // Analysis settings
    /// Whether the statistical and structural analyzers run concurrently.
    pub concurrent_analyzers: bool,

    // Visualization settings
    /// Maximum number of distribution charts to render.
    pub max_distribution_charts: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            // Quality defaults
            min_quality_score: 60.0,
            required_fields_ratio: 1.0,

            // Analysis defaults
            concurrent_analyzers: true,

            // Visualization defaults
            max_distribution_charts: 5,
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATASIGHT_MIN_QUALITY_SCORE`: Quality gate threshold (default: 60.0)
    /// - `DATASIGHT_REQUIRED_FIELDS_RATIO`: Required columns ratio (default: 1.0)
    /// - `DATASIGHT_CONCURRENT_ANALYZERS`: Run analyzers concurrently (default: true)
    /// - `DATASIGHT_MAX_DISTRIBUTION_CHARTS`: Distribution chart cap (default: 5)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("DATASIGHT_MIN_QUALITY_SCORE") {
            config.min_quality_score = parse_env_value(&val, "DATASIGHT_MIN_QUALITY_SCORE")?;
        }

        if let Ok(val) = std::env::var("DATASIGHT_REQUIRED_FIELDS_RATIO") {
            config.required_fields_ratio =
                parse_env_value(&val, "DATASIGHT_REQUIRED_FIELDS_RATIO")?;
        }

        if let Ok(val) = std::env::var("DATASIGHT_CONCURRENT_ANALYZERS") {
            config.concurrent_analyzers = parse_env_bool(&val, "DATASIGHT_CONCURRENT_ANALYZERS")?;
        }

        if let Ok(val) = std::env::var("DATASIGHT_MAX_DISTRIBUTION_CHARTS") {
            config.max_distribution_charts =
                parse_env_value(&val, "DATASIGHT_MAX_DISTRIBUTION_CHARTS")?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.min_quality_score) {
            return Err(ConfigError::ValidationFailed(
                "min_quality_score must be between 0.0 and 100.0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.required_fields_ratio) {
            return Err(ConfigError::ValidationFailed(
                "required_fields_ratio must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.max_distribution_charts == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_distribution_charts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder method to set the quality gate threshold.
    pub fn with_min_quality_score(mut self, score: f64) -> Self {
        self.min_quality_score = score;
        self
    }

    /// Builder method to set the required columns ratio.
    pub fn with_required_fields_ratio(mut self, ratio: f64) -> Self {
        self.required_fields_ratio = ratio;
        self
    }

    /// Builder method to enable or disable concurrent analyzers.
    pub fn with_concurrent_analyzers(mut self, enabled: bool) -> Self {
        self.concurrent_analyzers = enabled;
        self
    }

    /// Builder method to set the distribution chart cap.
    pub fn with_max_distribution_charts(mut self, max: usize) -> Self {
        self.max_distribution_charts = max;
        self
    }
}

/// Parse an environment variable value into a type.
fn parse_env_value<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("could not parse '{}'", value),
    })
}

/// Parse an environment variable as a boolean.
fn parse_env_bool(value: &str, key: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected boolean value, got '{}'", value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert!((config.min_quality_score - 60.0).abs() < f64::EPSILON);
        assert!((config.required_fields_ratio - 1.0).abs() < f64::EPSILON);
        assert!(config.concurrent_analyzers);
        assert_eq!(config.max_distribution_charts, 5);
    }

    #[test]
    fn test_config_builder() {
        let config = PipelineConfig::new()
            .with_min_quality_score(80.0)
            .with_required_fields_ratio(0.5)
            .with_concurrent_analyzers(false)
            .with_max_distribution_charts(3);

        assert!((config.min_quality_score - 80.0).abs() < f64::EPSILON);
        assert!((config.required_fields_ratio - 0.5).abs() < f64::EPSILON);
        assert!(!config.concurrent_analyzers);
        assert_eq!(config.max_distribution_charts, 3);
    }

    #[test]
    fn test_validation_valid_config() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_quality_score() {
        let config = PipelineConfig::default().with_min_quality_score(150.0);
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("min_quality_score"));
    }

    #[test]
    fn test_validation_invalid_required_fields_ratio() {
        let config = PipelineConfig::default().with_required_fields_ratio(1.5);
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("required_fields_ratio"));
    }

    #[test]
    fn test_validation_zero_chart_cap() {
        let config = PipelineConfig::default().with_max_distribution_charts(0);
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("max_distribution_charts"));
    }

    #[test]
    fn test_parse_env_bool() {
        assert!(parse_env_bool("true", "test").unwrap());
        assert!(parse_env_bool("1", "test").unwrap());
        assert!(parse_env_bool("yes", "test").unwrap());
        assert!(parse_env_bool("TRUE", "test").unwrap());

        assert!(!parse_env_bool("false", "test").unwrap());
        assert!(!parse_env_bool("0", "test").unwrap());
        assert!(!parse_env_bool("off", "test").unwrap());

        assert!(parse_env_bool("invalid", "test").is_err());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            key: "KEY".to_string(),
            message: "bad value".to_string(),
        };
        assert!(err.to_string().contains("KEY"));
        assert!(err.to_string().contains("bad value"));

        let err = ConfigError::ValidationFailed("test failure".to_string());
        assert!(err.to_string().contains("test failure"));
    }
}
