//! Client construction errors.

use super::config::ConfigError;
use relay_types::RelayError;
use thiserror::Error;

/// Failure to bring up a [`RelayClient`](crate::RelayClient).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Channel establishment failed: {0}")]
    Connect(#[from] RelayError),
}
