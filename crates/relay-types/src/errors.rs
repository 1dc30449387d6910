//! # Error Taxonomy
//!
//! Structured, serializable error values exchanged between client and
//! provider. A `RelayError` produced on one side of the boundary and
//! reconstructed on the other compares equal field by field, so callers can
//! branch on [`ErrorKind`] and tests can assert with `assert_eq!`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Fixed set of error kinds understood by both sides of the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// The provider could not complete the request.
    RequestFailed,
    /// No response arrived within the request's timeout window.
    RequestTimeout,
    /// The caller cancelled a still-pending request.
    Cancelled,
    /// Inbound data did not decode into the expected shape.
    MalformedMessage,
    /// Inbound message came from an unexpected origin or window.
    ///
    /// Never surfaced to callers; the channel drops such traffic.
    OriginMismatch,
    /// The provider has no handler for the requested method.
    UnknownMethod,
}

impl ErrorKind {
    /// Stable wire name of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::RequestFailed => "requestFailed",
            ErrorKind::RequestTimeout => "requestTimeout",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::MalformedMessage => "malformedMessage",
            ErrorKind::OriginMismatch => "originMismatch",
            ErrorKind::UnknownMethod => "unknownMethod",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured relay error.
///
/// Pure data: two values with the same kind, message and context are equal.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct RelayError {
    /// Error kind.
    pub kind: ErrorKind,
    /// Human-oriented description. Not part of the protocol contract.
    pub message: String,
    /// Optional structured context.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_context"
    )]
    pub context: Option<serde_json::Value>,
}

/// A present `context` field is kept even when it is `null`; only an absent
/// field reads back as `None`.
fn present_context<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl RelayError {
    /// Create an error of the given kind without context.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
        }
    }

    /// Attach structured context.
    #[must_use]
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }

    /// The provider failed to complete the request.
    pub fn request_failed(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestFailed, reason)
    }

    /// The request timed out after `after`.
    pub fn timeout(after: Duration) -> Self {
        Self::new(
            ErrorKind::RequestTimeout,
            format!("request timed out after {}ms", after.as_millis()),
        )
        .with_context(serde_json::json!({ "timeoutMs": after.as_millis() as u64 }))
    }

    /// The caller cancelled the request.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "request cancelled")
    }

    /// Data that could not be decoded.
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedMessage, detail)
    }

    /// Traffic from an unexpected origin.
    pub fn origin_mismatch(expected: &str, actual: &str) -> Self {
        Self::new(ErrorKind::OriginMismatch, "unexpected sender origin").with_context(
            serde_json::json!({ "expected": expected, "actual": actual }),
        )
    }

    /// No handler registered for `method`.
    pub fn unknown_method(method: &str) -> Self {
        Self::new(ErrorKind::UnknownMethod, format!("unknown method: {method}"))
            .with_context(serde_json::json!({ "method": method }))
    }

    /// Returns true if this error has the given kind.
    #[must_use]
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

/// Result alias for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
