//! # Relay Channel - Origin-Pinned Messaging
//!
//! Secure messaging on top of a broadcast, spoofable transport.
//!
//! ## Layers
//!
//! ```text
//! ┌──────────────┐  send()                       ┌──────────────┐
//! │ SecureChannel│ ─────┐                  ┌──── │ SecureChannel│
//! │  (client)    │      │                  │     │  (provider)  │
//! └──────▲───────┘      ▼                  │     └──────────────┘
//!        │        ┌──────────────────────────┐
//!        │        │   TransportBinding       │
//!        └─────── │ (post / inbound events)  │ ◄── any other code on the page
//!   verify_inbound└──────────────────────────┘
//! ```
//!
//! ## Security
//!
//! - **Pinned Peer:** a channel is bound to one origin + window for life.
//! - **Silent Drops:** spoofed, stray or malformed traffic never reaches
//!   listeners and is never reported back to the sender.
//! - **Snapshot Fan-Out:** listeners may unsubscribe themselves or siblings
//!   mid-delivery without skipped or duplicated deliveries.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod channel;
pub mod memory;
pub mod ports;
pub mod registry;
pub mod validation;

pub use channel::{ChannelStats, SecureChannel, WeakSecureChannel};
pub use memory::{InMemoryPage, InMemoryWindow, PageStats};
pub use ports::{HandlerId, InboundEvent, InboundHandler, TransportBinding};
pub use registry::{Listener, ListenerId, ListenerRegistry};
pub use validation::{verify_inbound, InboundVerdict};

/// Default time a client waits for the provider's `Ready` message.
pub const DEFAULT_READY_TIMEOUT_MS: u64 = 5_000;
