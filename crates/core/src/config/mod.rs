//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CRUMBWISE_*)
//! 2. TOML config file (if CRUMBWISE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::store::DEFAULT_CACHE_KEY;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CRUMBWISE_*)
/// 2. TOML config file (if CRUMBWISE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite storage file. Unset keeps the cache in memory.
    ///
    /// Set via CRUMBWISE_DB_PATH environment variable.
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Storage key holding the domain to analysis mapping.
    ///
    /// Set via CRUMBWISE_CACHE_KEY environment variable.
    #[serde(default = "default_cache_key")]
    pub cache_key: String,

    /// Validity window of a cached analysis in milliseconds.
    ///
    /// Set via CRUMBWISE_TTL_MS environment variable.
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,

    /// Upper bound on a single generation in milliseconds.
    ///
    /// Set via CRUMBWISE_GENERATION_TIMEOUT_MS environment variable.
    #[serde(default = "default_generation_timeout_ms")]
    pub generation_timeout_ms: u64,

    /// Base URL of the local model server.
    ///
    /// Set via CRUMBWISE_MODEL_BASE_URL environment variable.
    #[serde(default = "default_model_base_url")]
    pub model_base_url: String,

    /// Model used for analyses.
    ///
    /// Set via CRUMBWISE_MODEL_NAME environment variable.
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Browser cookie export consulted when a request carries no cookies.
    ///
    /// Set via CRUMBWISE_COOKIE_JAR_PATH environment variable.
    #[serde(default)]
    pub cookie_jar_path: Option<PathBuf>,
}

fn default_cache_key() -> String {
    DEFAULT_CACHE_KEY.into()
}

fn default_ttl_ms() -> u64 {
    86_400_000 // 24h
}

fn default_generation_timeout_ms() -> u64 {
    120_000
}

fn default_model_base_url() -> String {
    "http://127.0.0.1:11434".into()
}

fn default_model_name() -> String {
    "gemma3:1b".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            cache_key: default_cache_key(),
            ttl_ms: default_ttl_ms(),
            generation_timeout_ms: default_generation_timeout_ms(),
            model_base_url: default_model_base_url(),
            model_name: default_model_name(),
            cookie_jar_path: None,
        }
    }
}

impl AppConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_millis(self.generation_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered sources, before extraction.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CRUMBWISE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("CRUMBWISE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
