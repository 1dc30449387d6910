//! Domain types for the request correlation layer.
//!
//! Pure data and descriptors; no I/O.

pub mod config;
pub mod error;
pub mod method;
pub mod state;

pub use config::{ConfigError, RelayConfig};
pub use error::ClientError;
pub use method::{DisableAutoSignIn, ProxyLogin, RpcMethod, DEFAULT_REQUEST_TIMEOUT};
pub use state::RequestState;
