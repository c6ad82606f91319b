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

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `port` is 0
    /// - `max_limit` is 0
    /// - `query_timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `host` is empty
    ///
    /// Returns `ConfigError::Missing` if `db_path` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing {
                field: "db_path".into(),
                hint: "Set CITYFIND_DB_PATH environment variable".into(),
            });
        }

        if self.host.is_empty() {
            return Err(ConfigError::Invalid { field: "host".into(), reason: "must not be empty".into() });
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid { field: "port".into(), reason: "must be greater than 0".into() });
        }

        if self.max_limit == 0 {
            return Err(ConfigError::Invalid { field: "max_limit".into(), reason: "must be at least 1".into() });
        }

        if self.query_timeout_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "query_timeout_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.query_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "query_timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.cache_size == 0 {
            tracing::warn!("cache_size is 0; the search cache will be cleared on every request");
        }

        Ok(())
    }
}
