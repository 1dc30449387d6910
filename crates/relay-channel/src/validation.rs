//! # Inbound Validation
//!
//! The single decision point for inbound traffic: deliver or drop.
//!
//! ## Rule
//!
//! 1. The claimed origin must equal the pinned origin exactly.
//! 2. If the transport reports a sender window and the pin has one, they
//!    must be equal. Without a reported sender, the origin alone decides.
//! 3. The data must decode into a [`ProtocolMessage`].
//!
//! Checks run in this order so untrusted data is never parsed before the
//! sender is known to be the peer.

use crate::ports::InboundEvent;
use relay_types::{PeerIdentity, ProtocolMessage, RelayError, WindowId};

/// Outcome of validating one inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundVerdict {
    /// Event passed every check.
    Deliver(ProtocolMessage),
    /// Claimed origin differs from the pinned origin.
    OriginMismatch { expected: String, actual: String },
    /// Sender window differs from the pinned window.
    SourceMismatch { expected: WindowId, actual: WindowId },
    /// Data is not a protocol message.
    Malformed(RelayError),
}

impl InboundVerdict {
    /// Returns true if the event should be delivered.
    #[must_use]
    pub fn is_deliver(&self) -> bool {
        matches!(self, InboundVerdict::Deliver(_))
    }

    /// Short reason label for logging dropped traffic.
    pub fn reason(&self) -> &'static str {
        match self {
            InboundVerdict::Deliver(_) => "deliver",
            InboundVerdict::OriginMismatch { .. } => "origin_mismatch",
            InboundVerdict::SourceMismatch { .. } => "source_mismatch",
            InboundVerdict::Malformed(_) => "malformed",
        }
    }
}

/// Validate `event` against the pinned `peer`.
pub fn verify_inbound(peer: &PeerIdentity, event: &InboundEvent) -> InboundVerdict {
    if !peer.origin.matches(&event.origin) {
        return InboundVerdict::OriginMismatch {
            expected: peer.origin.to_string(),
            actual: event.origin.clone(),
        };
    }

    if let (Some(expected), Some(actual)) = (peer.window, event.source) {
        if expected != actual {
            return InboundVerdict::SourceMismatch { expected, actual };
        }
    }

    match ProtocolMessage::decode(event.data.clone()) {
        Ok(message) => InboundVerdict::Deliver(message),
        Err(err) => InboundVerdict::Malformed(err),
    }
}
