//! # Relay RPC - Request Correlation over a Secure Channel
//!
//! Turns the fire-and-forget [`SecureChannel`](relay_channel::SecureChannel)
//! into request/response calls.
//!
//! ## Architecture
//!
//! ```text
//!   RelayClient ──request::<M>()──► RelayRequest<M> ──dispatch()──► RequestFuture
//!                                     │   │
//!                     add_listener ◄──┘   └──► TimerService::schedule
//!                                     │
//!                          SecureChannel (pinned to the provider)
//!                                     │
//!   RequestRouter ◄── Request ────────┘──── Response / Error ──► matching unit
//! ```
//!
//! - **Single-fire settlement:** response, error, timeout and cancel race;
//!   exactly one wins and the rest are inert.
//! - **Idempotent disposal:** listener and timer are released on the first
//!   terminal transition. `dispose` may be called any number of times.
//! - **Method descriptors:** new RPC methods implement [`RpcMethod`] and
//!   need no change to the unit.
//!
//! ## Usage
//!
//! ```ignore
//! let timers = Arc::new(TokioTimerService::try_current()?);
//! let client = RelayClient::connect(transport, provider, &RelayConfig::default(), timers).await?;
//! let response = client.proxy_login(credential).await?;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod request;
pub mod router;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{SequentialIdGenerator, TimerError, TokioTimerService, UuidIdGenerator};
pub use domain::{
    ClientError, ConfigError, DisableAutoSignIn, ProxyLogin, RelayConfig, RequestState, RpcMethod,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use ports::{IdGenerator, TimerCallback, TimerHandle, TimerService};
pub use request::{RelayRequest, RequestFuture};
pub use router::RequestRouter;
pub use service::RelayClient;
