//! Relay client configuration with validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("Invalid id prefix: {0}")]
    InvalidIdPrefix(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Client-side relay configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Timeout for every request, in milliseconds. When unset each method
    /// uses its own timeout.
    pub request_timeout_ms: Option<u64>,
    /// How long to wait for the provider's `Ready` message, in milliseconds.
    pub ready_timeout_ms: u64,
    /// When set, correlation ids are `<prefix>-<n>` instead of random UUIDs.
    pub id_prefix: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: None,
            ready_timeout_ms: relay_channel::DEFAULT_READY_TIMEOUT_MS,
            id_prefix: None,
        }
    }
}

impl RelayConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidTimeout(
                "request_timeout_ms cannot be 0".into(),
            ));
        }

        if self.ready_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout(
                "ready_timeout_ms cannot be 0".into(),
            ));
        }

        if let Some(prefix) = &self.id_prefix {
            if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidIdPrefix(format!(
                    "'{prefix}' must be non-empty and contain no whitespace"
                )));
            }
        }

        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }
}
