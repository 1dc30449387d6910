//! # Origins and Window Identities
//!
//! An origin is the scheme+host+port triple of web content. The relay's trust
//! model is origin based, so the representation is kept as the exact ASCII
//! serialization and compared with plain string equality.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Errors from origin parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OriginError {
    /// The input is not a URL.
    #[error("Invalid origin '{input}': {reason}")]
    Invalid { input: String, reason: String },

    /// The URL has an opaque origin (`data:`, `file:`, ...).
    #[error("Origin of '{input}' is opaque")]
    Opaque { input: String },
}

/// A tuple origin, e.g. `https://example.com` or `http://localhost:8080`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Origin(String);

impl Origin {
    /// Parse any URL and keep its origin.
    ///
    /// Paths, queries and fragments are discarded; default ports are elided
    /// and the host is lower-cased, as a browser would report it.
    pub fn parse(input: &str) -> Result<Self, OriginError> {
        let url = Url::parse(input).map_err(|e| OriginError::Invalid {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(OriginError::Opaque {
                input: input.to_string(),
            });
        }
        Ok(Self(origin.ascii_serialization()))
    }

    /// The serialized origin.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact, case-sensitive comparison against an origin string claimed by
    /// the transport. No wildcards, no subdomain matching.
    #[must_use]
    pub fn matches(&self, claimed: &str) -> bool {
        self.0 == claimed
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Origin {
    type Error = OriginError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Origin> for String {
    fn from(origin: Origin) -> Self {
        origin.0
    }
}

/// Opaque identity of an addressable window or frame.
///
/// Assigned by the transport binding; only meaningful for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(u64);

impl WindowId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// The peer a secure channel is pinned to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerIdentity {
    /// Peer origin, matched exactly.
    pub origin: Origin,
    /// Peer window; `None` when the container cannot yet provide one.
    pub window: Option<WindowId>,
}

impl PeerIdentity {
    pub fn new(origin: Origin, window: WindowId) -> Self {
        Self {
            origin,
            window: Some(window),
        }
    }

    /// A pin with no addressable window.
    pub fn origin_only(origin: Origin) -> Self {
        Self {
            origin,
            window: None,
        }
    }
}

impl fmt::Display for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.window {
            Some(window) => write!(f, "{}@{}", self.origin, window),
            None => write!(f, "{}", self.origin),
        }
    }
}
