//! # Relay Telemetry
//!
//! Structured logging setup for processes embedding the relay.
//!
//! The relay crates only emit `tracing` events. Whoever owns the process
//! decides where they go by installing a subscriber once at startup.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relay_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::with_level("info,relay_channel=debug"))?;
//! ```
//!
//! ## Levels
//!
//! | Level | Events |
//! |-------|--------|
//! | `info` | client connected |
//! | `debug` | channel open/dispose, request settled, timed out, cancelled |
//! | `trace` | dropped inbound traffic, dispatch, timers |
//! | `warn` | sends on disposed or unaddressed channels, replaced routes |

mod config;
mod logging;

pub use config::LogConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("A global subscriber is already installed")]
    AlreadyInitialized,
}
