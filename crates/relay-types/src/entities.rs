//! # Domain Entities
//!
//! Payload shapes carried by the relay's RPC methods. The relay core treats
//! these as opaque payloads; they live here so client and provider share one
//! definition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a credential authenticates its owner.
///
/// Either the built-in id-and-password method or the origin of a federated
/// identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthenticationMethod(String);

impl AuthenticationMethod {
    /// Wire value of the id-and-password method.
    pub const ID_AND_PASSWORD: &'static str = "relay://id-and-password";

    pub fn id_and_password() -> Self {
        Self(Self::ID_AND_PASSWORD.to_string())
    }

    /// A federated identity provider, identified by its origin.
    pub fn federated(provider_origin: impl Into<String>) -> Self {
        Self(provider_origin.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_id_and_password(&self) -> bool {
        self.0 == Self::ID_AND_PASSWORD
    }
}

impl fmt::Display for AuthenticationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A credential as exchanged between client and provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Account identifier, typically an email address.
    pub id: String,
    pub display_name: Option<String>,
    pub password: Option<String>,
    pub auth_method: AuthenticationMethod,
    pub profile_picture: Option<String>,
    /// Whether sign-in must be proxied through the provider.
    #[serde(default)]
    pub proxied_auth_required: bool,
}

impl Credential {
    /// An id-and-password credential with no display data.
    pub fn with_password(id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            password: Some(password.into()),
            auth_method: AuthenticationMethod::id_and_password(),
            profile_picture: None,
            proxied_auth_required: false,
        }
    }
}

/// Result of a proxied login: the upstream HTTP status and body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyLoginResponse {
    pub status_code: u16,
    pub response_text: String,
}

impl ProxyLoginResponse {
    pub fn new(status_code: u16, response_text: impl Into<String>) -> Self {
        Self {
            status_code,
            response_text: response_text.into(),
        }
    }

    /// 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Options for displaying the provider container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Requested container height in CSS pixels.
    pub height: Option<u32>,
}
