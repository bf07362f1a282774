//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_key` is empty
    /// - `ttl_ms` is 0
    /// - `generation_timeout_ms` is under 1 second or over 10 minutes
    /// - `model_base_url` or `model_name` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_key.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "cache_key".into(), reason: "must not be empty".into() });
        }

        if self.ttl_ms == 0 {
            return Err(ConfigError::Invalid { field: "ttl_ms".into(), reason: "must be greater than 0".into() });
        }

        if self.generation_timeout_ms < 1_000 {
            return Err(ConfigError::Invalid {
                field: "generation_timeout_ms".into(),
                reason: "must be at least 1000ms".into(),
            });
        }
        if self.generation_timeout_ms > 600_000 {
            return Err(ConfigError::Invalid {
                field: "generation_timeout_ms".into(),
                reason: "must not exceed 10 minutes (600000ms)".into(),
            });
        }

        if self.model_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "model_base_url".into(), reason: "must not be empty".into() });
        }

        if self.model_name.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "model_name".into(), reason: "must not be empty".into() });
        }

        if self.db_path.is_none() {
            tracing::warn!("db_path is not set; cached analyses will not survive a restart");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_cache_key() {
        let config = AppConfig { cache_key: "  ".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_key"));
    }

    #[test]
    fn test_validate_zero_ttl() {
        let config = AppConfig { ttl_ms: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "ttl_ms"));
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { generation_timeout_ms: 999, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "generation_timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { generation_timeout_ms: 600_001, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "generation_timeout_ms"));
    }

    #[test]
    fn test_validate_empty_model() {
        let config = AppConfig { model_name: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "model_name"));

        let config = AppConfig { model_base_url: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "model_base_url"));
    }

    #[test]
    fn test_validate_edge_values() {
        let config = AppConfig { ttl_ms: 1, generation_timeout_ms: 1_000, ..Default::default() };
        assert!(config.validate().is_ok());

        let config = AppConfig { generation_timeout_ms: 600_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
