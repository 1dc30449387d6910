//! # Relay Types Crate
//!
//! Message model, error taxonomy and identities shared by the client and
//! provider sides of the cross-origin credential relay.
//!
//! ## Design Principles
//!
//! - **Pure Data**: every type here is plain, serializable data with
//!   structural equality. Nothing depends on reference identity.
//! - **Closed Message Set**: [`ProtocolMessage`] is a sum type; routing code
//!   matches on it exhaustively.
//! - **Exact Origins**: [`Origin`] stores the ASCII serialization and is
//!   compared with string equality.

pub mod correlation;
pub mod entities;
pub mod errors;
pub mod messages;
pub mod origin;

pub use correlation::CorrelationId;
pub use entities::*;
pub use errors::{ErrorKind, RelayError, RelayResult};
pub use messages::{
    error_message, method_names, proxy_login_message, proxy_login_response_message, MessageKind,
    ProtocolMessage,
};
pub use origin::{Origin, OriginError, PeerIdentity, WindowId};
