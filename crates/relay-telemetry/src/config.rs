//! Logging configuration.

use crate::TelemetryError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// How log output is filtered and formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directives in `EnvFilter` syntax, e.g. `info,relay_rpc=debug`.
    pub log_level: String,

    /// Whether to emit one JSON object per event
    pub json_logs: bool,

    /// Whether to colour console output
    pub ansi: bool,

    /// Whether to include the event target (module path)
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            ansi: true,
            with_target: true,
        }
    }
}

impl LogConfig {
    /// Console config at `level`.
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            log_level: level.into(),
            ..Self::default()
        }
    }

    /// Build the filter described by `log_level`.
    pub fn filter(&self) -> Result<EnvFilter, TelemetryError> {
        EnvFilter::try_new(&self.log_level)
            .map_err(|e| TelemetryError::Config(format!("log_level '{}': {e}", self.log_level)))
    }

    pub fn validate(&self) -> Result<(), TelemetryError> {
        self.filter().map(|_| ())
    }
}
