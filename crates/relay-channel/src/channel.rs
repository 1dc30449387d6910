//! # Secure Channel
//!
//! A message pipe pinned to one peer (origin + window) for its whole
//! lifetime. Outbound messages are addressed to the pinned window and tagged
//! with the pinned origin; inbound traffic is delivered to listeners only if
//! it passes [`verify_inbound`]. Everything else is dropped silently, because
//! other content sharing the page uses the same primitive and must be able to
//! neither probe nor disturb the channel.

use crate::ports::{HandlerId, InboundEvent, TransportBinding};
use crate::registry::{Listener, ListenerId, ListenerRegistry};
use crate::validation::{verify_inbound, InboundVerdict};
use parking_lot::Mutex;
use relay_types::{PeerIdentity, ProtocolMessage, RelayError, RelayResult};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

/// Traffic counters for a channel.
#[derive(Debug, Default)]
pub struct ChannelStats {
    /// Messages handed to the transport.
    pub sent: AtomicU64,
    /// Inbound messages that passed validation.
    pub delivered: AtomicU64,
    /// Inbound events dropped by validation.
    pub dropped: AtomicU64,
}

struct ChannelInner {
    transport: Arc<dyn TransportBinding>,
    peer: PeerIdentity,
    listeners: ListenerRegistry<ProtocolMessage>,
    transport_handler: Mutex<Option<HandlerId>>,
    disposed: AtomicBool,
    stats: ChannelStats,
}

impl ChannelInner {
    fn handle_inbound(&self, event: &InboundEvent) {
        if self.disposed.load(Ordering::Acquire) {
            return;
        }

        let message = match verify_inbound(&self.peer, event) {
            InboundVerdict::Deliver(message) => message,
            verdict => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                trace!(
                    peer = %self.peer,
                    origin = %event.origin,
                    reason = verdict.reason(),
                    "Inbound event dropped"
                );
                return;
            }
        };

        self.stats.delivered.fetch_add(1, Ordering::Relaxed);
        trace!(peer = %self.peer, kind = %message.kind(), "Inbound message accepted");
        self.listeners
            .fan_out(&message, || !self.disposed.load(Ordering::Acquire));
    }

    fn detach(&self) {
        if let Some(handler) = self.transport_handler.lock().take() {
            self.transport.remove_inbound_handler(handler);
        }
    }
}

impl Drop for ChannelInner {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Handle to a secure channel. Clones share the same channel.
#[derive(Clone)]
pub struct SecureChannel {
    inner: Arc<ChannelInner>,
}

impl SecureChannel {
    /// Pin a channel to `peer` on top of `transport`.
    pub fn new(transport: Arc<dyn TransportBinding>, peer: PeerIdentity) -> Self {
        let inner = Arc::new(ChannelInner {
            transport,
            peer,
            listeners: ListenerRegistry::new(),
            transport_handler: Mutex::new(None),
            disposed: AtomicBool::new(false),
            stats: ChannelStats::default(),
        });

        let weak: Weak<ChannelInner> = Arc::downgrade(&inner);
        let handler = inner
            .transport
            .add_inbound_handler(Arc::new(move |event: &InboundEvent| {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_inbound(event);
                }
            }));
        *inner.transport_handler.lock() = Some(handler);

        debug!(peer = %inner.peer, "Secure channel opened");
        Self { inner }
    }

    /// Provider side of establishment: pin the client and announce readiness.
    ///
    /// The announcement is repeated whenever the pinned client sends its own
    /// `Ready`, so a client that starts listening late still completes the
    /// handshake.
    pub fn connect_provider(transport: Arc<dyn TransportBinding>, client: PeerIdentity) -> Self {
        let channel = Self::new(transport, client);
        let weak = channel.downgrade();
        channel.add_listener(Arc::new(move |message: &ProtocolMessage| {
            if !matches!(message, ProtocolMessage::Ready) {
                return;
            }
            if let Some(channel) = weak.upgrade() {
                trace!(peer = %channel.peer(), "Client hello; repeating Ready");
                channel.send(&ProtocolMessage::ready());
            }
        }));
        channel.send(&ProtocolMessage::ready());
        channel
    }

    /// Client side of establishment: pin the provider and wait for its
    /// `Ready` message.
    ///
    /// Once listening, the client sends a `Ready` of its own; a provider that
    /// announced earlier answers it. Only a `Ready` that passes the
    /// channel's inbound validation counts.
    ///
    /// # Errors
    ///
    /// A `RequestTimeout` error if no valid `Ready` arrives within
    /// `ready_timeout`. The channel is disposed in that case.
    pub async fn connect_client(
        transport: Arc<dyn TransportBinding>,
        provider: PeerIdentity,
        ready_timeout: Duration,
    ) -> RelayResult<Self> {
        let channel = Self::new(transport, provider);
        let (tx, rx) = oneshot::channel::<()>();
        let tx = Mutex::new(Some(tx));
        let listener = channel.add_listener(Arc::new(move |message: &ProtocolMessage| {
            if matches!(message, ProtocolMessage::Ready) {
                if let Some(tx) = tx.lock().take() {
                    let _ = tx.send(());
                }
            }
        }));
        channel.send(&ProtocolMessage::ready());

        let outcome = tokio::time::timeout(ready_timeout, rx).await;
        channel.remove_listener(listener);

        match outcome {
            Ok(Ok(())) => {
                debug!(peer = %channel.peer(), "Provider ready");
                Ok(channel)
            }
            _ => {
                warn!(
                    peer = %channel.peer(),
                    timeout_ms = ready_timeout.as_millis() as u64,
                    "Provider did not signal readiness"
                );
                channel.dispose();
                Err(RelayError::timeout(ready_timeout))
            }
        }
    }

    /// Send a message to the pinned peer.
    ///
    /// Fire-and-forget: never fails. Sends on a disposed channel, or on a
    /// channel whose peer has no addressable window, are dropped with a
    /// warning.
    pub fn send(&self, message: &ProtocolMessage) {
        if self.is_disposed() {
            warn!(peer = %self.inner.peer, kind = %message.kind(), "Send on disposed channel dropped");
            return;
        }
        let Some(target) = self.inner.peer.window else {
            warn!(peer = %self.inner.peer, kind = %message.kind(), "Peer has no window; send dropped");
            return;
        };
        let data = match message.encode() {
            Ok(data) => data,
            Err(err) => {
                warn!(peer = %self.inner.peer, error = %err, "Message encoding failed; send dropped");
                return;
            }
        };

        self.inner.stats.sent.fetch_add(1, Ordering::Relaxed);
        trace!(peer = %self.inner.peer, kind = %message.kind(), id = ?message.id(), "Sending message");
        self.inner
            .transport
            .post(target, data, &self.inner.peer.origin);
    }

    /// Register a listener for validated inbound messages.
    ///
    /// On a disposed channel the listener is accepted but never invoked.
    pub fn add_listener(&self, listener: Listener<ProtocolMessage>) -> ListenerId {
        let id = self.inner.listeners.add(listener);
        if self.is_disposed() {
            self.inner.listeners.remove(id);
        }
        trace!(peer = %self.inner.peer, listener = %id, "Listener added");
        id
    }

    /// Deregister a listener. Unknown ids are ignored.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = self.inner.listeners.remove(id);
        if removed {
            trace!(peer = %self.inner.peer, listener = %id, "Listener removed");
        }
        removed
    }

    /// Detach from the transport and drop all listeners. Idempotent.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.detach();
        self.inner.listeners.clear();
        debug!(peer = %self.inner.peer, "Secure channel disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    pub fn downgrade(&self) -> WeakSecureChannel {
        WeakSecureChannel {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// The peer this channel is pinned to.
    pub fn peer(&self) -> &PeerIdentity {
        &self.inner.peer
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    pub fn stats(&self) -> &ChannelStats {
        &self.inner.stats
    }
}

/// Non-owning handle to a secure channel.
///
/// Listeners that need to reply on the channel they are registered on hold
/// one of these, so the registration does not keep the channel alive.
#[derive(Clone)]
pub struct WeakSecureChannel {
    inner: Weak<ChannelInner>,
}

impl WeakSecureChannel {
    pub fn upgrade(&self) -> Option<SecureChannel> {
        self.inner.upgrade().map(|inner| SecureChannel { inner })
    }
}

impl std::fmt::Debug for SecureChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureChannel")
            .field("peer", &self.inner.peer)
            .field("listeners", &self.inner.listeners.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
