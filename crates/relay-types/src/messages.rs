//! # Protocol Messages
//!
//! The closed set of messages exchanged over a secure channel.
//!
//! ## Wire Shape
//!
//! ```text
//! { "type": "REQUEST",  "id": "...", "method": "proxyLogin", "payload": {...} }
//! { "type": "RESPONSE", "id": "...", "payload": {...} }
//! { "type": "ERROR",    "id": "...", "payload": { "kind": "...", "message": "..." } }
//! { "type": "READY" }
//! ```
//!
//! Every kind is self-describing, so a single router can dispatch inbound
//! traffic without knowing anything about individual methods.

use crate::correlation::CorrelationId;
use crate::entities::{Credential, ProxyLoginResponse};
use crate::errors::{RelayError, RelayResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Method names understood by providers.
pub mod method_names {
    /// Relay a login through the provider's origin.
    pub const PROXY_LOGIN: &str = "proxyLogin";
    /// Ask the provider to stop signing the user in automatically.
    pub const DISABLE_AUTO_SIGN_IN: &str = "disableAutoSignIn";
}

/// Message discriminant, for logging and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Request,
    Response,
    Error,
    Ready,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::Request => "REQUEST",
            MessageKind::Response => "RESPONSE",
            MessageKind::Error => "ERROR",
            MessageKind::Ready => "READY",
        };
        f.write_str(name)
    }
}

/// A protocol message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProtocolMessage {
    /// An RPC call.
    Request {
        id: CorrelationId,
        method: String,
        payload: serde_json::Value,
    },
    /// Successful result of the call with the same id.
    Response {
        id: CorrelationId,
        payload: serde_json::Value,
    },
    /// Failure of the call with the same id.
    Error {
        id: CorrelationId,
        payload: RelayError,
    },
    /// Channel establishment signal. Carries no id.
    Ready,
}

impl ProtocolMessage {
    /// Build a request message.
    ///
    /// # Errors
    ///
    /// `MalformedMessage` if the payload cannot be represented as JSON.
    pub fn request<P: Serialize + ?Sized>(
        id: CorrelationId,
        method: impl Into<String>,
        payload: &P,
    ) -> RelayResult<Self> {
        Ok(ProtocolMessage::Request {
            id,
            method: method.into(),
            payload: to_payload(payload)?,
        })
    }

    /// Build a response message.
    ///
    /// # Errors
    ///
    /// `MalformedMessage` if the result cannot be represented as JSON.
    pub fn response<R: Serialize + ?Sized>(id: CorrelationId, result: &R) -> RelayResult<Self> {
        Ok(ProtocolMessage::Response {
            id,
            payload: to_payload(result)?,
        })
    }

    /// Build an error message.
    pub fn error(id: CorrelationId, error: RelayError) -> Self {
        ProtocolMessage::Error { id, payload: error }
    }

    /// Build a ready message.
    pub fn ready() -> Self {
        ProtocolMessage::Ready
    }

    /// Correlation id, absent for `Ready`.
    pub fn id(&self) -> Option<&CorrelationId> {
        match self {
            ProtocolMessage::Request { id, .. }
            | ProtocolMessage::Response { id, .. }
            | ProtocolMessage::Error { id, .. } => Some(id),
            ProtocolMessage::Ready => None,
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            ProtocolMessage::Request { .. } => MessageKind::Request,
            ProtocolMessage::Response { .. } => MessageKind::Response,
            ProtocolMessage::Error { .. } => MessageKind::Error,
            ProtocolMessage::Ready => MessageKind::Ready,
        }
    }

    /// Encode to the wire representation.
    ///
    /// # Errors
    ///
    /// `MalformedMessage` if serialization fails.
    pub fn encode(&self) -> RelayResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| RelayError::malformed(e.to_string()))
    }

    /// Decode from the wire representation.
    ///
    /// # Errors
    ///
    /// `MalformedMessage` if the value is not a protocol message.
    pub fn decode(value: serde_json::Value) -> RelayResult<Self> {
        serde_json::from_value(value).map_err(|e| RelayError::malformed(e.to_string()))
    }
}

fn to_payload<P: Serialize + ?Sized>(payload: &P) -> RelayResult<serde_json::Value> {
    serde_json::to_value(payload).map_err(|e| RelayError::malformed(e.to_string()))
}

/// `proxyLogin` request for `credential`.
///
/// # Errors
///
/// `MalformedMessage` if the credential cannot be serialized.
pub fn proxy_login_message(
    id: CorrelationId,
    credential: &Credential,
) -> RelayResult<ProtocolMessage> {
    ProtocolMessage::request(id, method_names::PROXY_LOGIN, credential)
}

/// Response to a `proxyLogin` request.
///
/// # Errors
///
/// `MalformedMessage` if the response cannot be serialized.
pub fn proxy_login_response_message(
    id: CorrelationId,
    response: &ProxyLoginResponse,
) -> RelayResult<ProtocolMessage> {
    ProtocolMessage::response(id, response)
}

/// Error reply for the request with `id`.
pub fn error_message(id: CorrelationId, error: RelayError) -> ProtocolMessage {
    ProtocolMessage::error(id, error)
}
