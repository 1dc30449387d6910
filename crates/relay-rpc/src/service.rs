//! Relay client service - the caller-facing entry point.
//!
//! Builds request units for any [`RpcMethod`] on one secure channel and
//! exposes one-call helpers for the methods the provider supports.

use crate::adapters::{SequentialIdGenerator, UuidIdGenerator};
use crate::domain::{
    ClientError, ConfigError, DisableAutoSignIn, ProxyLogin, RelayConfig, RpcMethod,
};
use crate::ports::{IdGenerator, TimerService};
use crate::request::RelayRequest;
use relay_channel::{SecureChannel, TransportBinding};
use relay_types::{Credential, PeerIdentity, ProxyLoginResponse, RelayResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Client side of the relay: issues requests to the provider.
#[derive(Clone)]
pub struct RelayClient {
    channel: SecureChannel,
    timers: Arc<dyn TimerService>,
    ids: Arc<dyn IdGenerator>,
    request_timeout: Option<Duration>,
}

impl RelayClient {
    /// Client on an established channel. Each method uses its own timeout.
    pub fn new(
        channel: SecureChannel,
        timers: Arc<dyn TimerService>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            channel,
            timers,
            ids,
            request_timeout: None,
        }
    }

    /// Client on an established channel, configured by `config`.
    pub fn from_config(
        channel: SecureChannel,
        timers: Arc<dyn TimerService>,
        config: &RelayConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let ids: Arc<dyn IdGenerator> = match &config.id_prefix {
            Some(prefix) => Arc::new(SequentialIdGenerator::new(prefix.clone())),
            None => Arc::new(UuidIdGenerator),
        };

        Ok(Self {
            request_timeout: config.request_timeout(),
            ..Self::new(channel, timers, ids)
        })
    }

    /// Pin a channel to `provider`, wait for its `Ready` and build a client.
    pub async fn connect(
        transport: Arc<dyn TransportBinding>,
        provider: PeerIdentity,
        config: &RelayConfig,
        timers: Arc<dyn TimerService>,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        let channel =
            SecureChannel::connect_client(transport, provider, config.ready_timeout()).await?;
        info!(peer = %channel.peer(), "Relay client connected");
        Ok(Self::from_config(channel, timers, config)?)
    }

    /// Fresh pending unit for method `M`.
    pub fn request<M: RpcMethod>(&self) -> RelayRequest<M> {
        RelayRequest::with_timeout(
            self.channel.clone(),
            Arc::clone(&self.timers),
            self.ids.next_id(),
            self.request_timeout.unwrap_or(M::TIMEOUT),
        )
    }

    /// Dispatch one request and wait for its outcome.
    pub async fn call<M: RpcMethod>(&self, payload: M::Payload) -> RelayResult<M::Output> {
        let request = self.request::<M>();
        request.dispatch(payload).await
    }

    /// Have the provider perform a login with `credential`.
    pub async fn proxy_login(&self, credential: Credential) -> RelayResult<ProxyLoginResponse> {
        self.call::<ProxyLogin>(credential).await
    }

    pub async fn disable_auto_sign_in(&self) -> RelayResult<()> {
        self.call::<DisableAutoSignIn>(()).await
    }

    pub fn channel(&self) -> &SecureChannel {
        &self.channel
    }

    /// Dispose the channel. Requests still pending receive nothing further
    /// and settle on their timeout; requests dispatched afterwards reject
    /// with `Cancelled` at once.
    pub fn close(&self) {
        self.channel.dispose();
    }
}

impl std::fmt::Debug for RelayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayClient")
            .field("channel", &self.channel)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
