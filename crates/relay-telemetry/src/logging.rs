//! Global `tracing` subscriber installation.
//!
//! Events are written by the fmt layer, either human-readable or as JSON
//! objects with the event's structured fields (`id`, `method`, `peer`, ...)
//! flattened alongside `level`, `target` and `message`.

use crate::{LogConfig, TelemetryError};

/// Install the process-wide subscriber described by `config`.
///
/// The filter is checked before anything is installed, so an invalid
/// `log_level` never leaves the process half-configured.
pub fn init_logging(config: &LogConfig) -> Result<(), TelemetryError> {
    let filter = config.filter()?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_ansi(config.ansi);

    let installed = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|_| TelemetryError::AlreadyInitialized)?;

    tracing::debug!(
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Logging initialized"
    );
    Ok(())
}
