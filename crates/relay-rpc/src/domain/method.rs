//! RPC method descriptors.
//!
//! A method fixes the payload type, the result type and the timeout of a
//! request. The generic request unit needs nothing else to support a new
//! method.

use relay_types::{method_names, Credential, ProxyLoginResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Timeout applied when a method does not override it.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Descriptor of one RPC method.
pub trait RpcMethod: Send + Sync + 'static {
    /// Wire name carried in `Request` messages.
    const NAME: &'static str;

    /// How long a request waits for its response.
    const TIMEOUT: Duration = DEFAULT_REQUEST_TIMEOUT;

    /// Request payload.
    type Payload: Serialize + DeserializeOwned + Send + 'static;

    /// Response result.
    type Output: Serialize + DeserializeOwned + Send + 'static;
}

/// Relay a login through the provider, which performs the upstream
/// request from its own origin and returns the status and body.
#[derive(Debug, Clone, Copy)]
pub struct ProxyLogin;

impl RpcMethod for ProxyLogin {
    const NAME: &'static str = method_names::PROXY_LOGIN;
    const TIMEOUT: Duration = Duration::from_millis(10_000);
    type Payload = Credential;
    type Output = ProxyLoginResponse;
}

/// Ask the provider to stop automatic sign-in for this client.
#[derive(Debug, Clone, Copy)]
pub struct DisableAutoSignIn;

impl RpcMethod for DisableAutoSignIn {
    const NAME: &'static str = method_names::DISABLE_AUTO_SIGN_IN;
    const TIMEOUT: Duration = Duration::from_millis(3_000);
    type Payload = ();
    type Output = ();
}
