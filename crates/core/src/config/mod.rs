//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CITYFIND_*)
//! 2. Unprefixed `CACHE_SIZE` and `APP_PORT`, as read by older `.env` files
//! 3. TOML config file (if CITYFIND_CONFIG_FILE set)
//! 4. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CITYFIND_*)
/// 2. TOML config file (if CITYFIND_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Interface the HTTP server binds to.
    ///
    /// Set via CITYFIND_HOST environment variable.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port.
    ///
    /// Set via CITYFIND_PORT environment variable.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the SQLite countries/states/cities dataset.
    ///
    /// Set via CITYFIND_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Entry count past which the search cache is cleared.
    ///
    /// Set via CITYFIND_CACHE_SIZE environment variable.
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,

    /// Largest accepted search limit.
    ///
    /// Set via CITYFIND_MAX_LIMIT environment variable.
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,

    /// Deadline for a single dataset query in milliseconds.
    ///
    /// Set via CITYFIND_QUERY_TIMEOUT_MS environment variable.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./world.sqlite3")
}

fn default_cache_size() -> usize {
    1000
}

fn default_max_limit() -> u32 {
    1000
}

fn default_query_timeout_ms() -> u64 {
    5_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
            cache_size: default_cache_size(),
            max_limit: default_max_limit(),
            query_timeout_ms: default_query_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Query deadline as Duration for use with tokio.
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// `host:port` string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `CITYFIND_`
    /// 2. Unprefixed `CACHE_SIZE` and `APP_PORT` (mapped to `port`)
    /// 3. TOML file from `CITYFIND_CONFIG_FILE` (if set)
    /// 4. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CITYFIND_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(Env::raw().only(&["cache_size", "app_port"]).map(|key| {
            if key.as_str().eq_ignore_ascii_case("app_port") {
                "port".into()
            } else {
                key.as_str().to_lowercase().into()
            }
        }));

        figment = figment.merge(
            Env::prefixed("CITYFIND_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
