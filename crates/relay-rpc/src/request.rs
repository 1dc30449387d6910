//! # Request Correlation Unit
//!
//! One in-flight RPC call on a [`SecureChannel`]. The unit owns a
//! correlation id, a channel listener and a timeout timer, and settles
//! exactly once on whichever comes first:
//!
//! - a `Response` with its id (resolved)
//! - an `Error` with its id (rejected with the provider's error)
//! - the timeout (rejected with `RequestTimeout`)
//! - `cancel` / `dispose` / drop (rejected with `Cancelled`)
//!
//! Settlement and cleanup happen together behind a single-fire guard. Every
//! event observed after that is inert.

use crate::domain::{RequestState, RpcMethod};
use crate::ports::{TimerHandle, TimerService};
use parking_lot::Mutex;
use relay_channel::{ListenerId, SecureChannel};
use relay_types::{CorrelationId, ProtocolMessage, RelayError, RelayResult};
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, trace};

struct UnitState<T> {
    phase: RequestState,
    dispatched: bool,
    disposed: bool,
    settle: Option<oneshot::Sender<RelayResult<T>>>,
    listener: Option<ListenerId>,
    timer: Option<TimerHandle>,
}

struct UnitShared<M: RpcMethod> {
    id: CorrelationId,
    channel: SecureChannel,
    timers: Arc<dyn TimerService>,
    timeout: Duration,
    state: Mutex<UnitState<M::Output>>,
    _method: PhantomData<fn() -> M>,
}

impl<M: RpcMethod> UnitShared<M> {
    fn on_message(&self, message: &ProtocolMessage) {
        let outcome = match message {
            ProtocolMessage::Response { id, payload } if *id == self.id => {
                serde_json::from_value::<M::Output>(payload.clone()).map_err(|e| {
                    RelayError::malformed(format!("invalid {} response: {e}", M::NAME))
                })
            }
            ProtocolMessage::Error { id, payload } if *id == self.id => Err(payload.clone()),
            _ => return,
        };

        if self.terminate(Some(outcome)) {
            debug!(id = %self.id, method = M::NAME, kind = %message.kind(), "Request settled");
        }
    }

    fn on_timeout(&self) {
        if self.terminate(Some(Err(RelayError::timeout(self.timeout)))) {
            debug!(
                id = %self.id,
                method = M::NAME,
                timeout_ms = self.timeout.as_millis() as u64,
                "Request timed out"
            );
        }
    }

    /// Move to a terminal state and release the listener and timer.
    ///
    /// `None` settles as cancelled. Returns `false` if the unit was already
    /// terminal, in which case nothing happens.
    fn terminate(&self, outcome: Option<RelayResult<M::Output>>) -> bool {
        let (settle, listener, timer) = {
            let mut state = self.state.lock();
            if state.disposed {
                return false;
            }
            state.disposed = true;
            state.phase = match outcome {
                Some(Ok(_)) => RequestState::Resolved,
                _ => RequestState::Rejected,
            };
            (state.settle.take(), state.listener.take(), state.timer.take())
        };

        if let Some(listener) = listener {
            self.channel.remove_listener(listener);
        }
        if let Some(timer) = timer {
            self.timers.cancel(timer);
        }
        if let Some(settle) = settle {
            // The caller may have dropped the future; nothing to report then.
            let _ = settle.send(outcome.unwrap_or_else(|| Err(RelayError::cancelled())));
        }
        true
    }
}

/// One RPC call of method `M`.
///
/// Dropping the unit disposes it.
pub struct RelayRequest<M: RpcMethod> {
    shared: Arc<UnitShared<M>>,
}

impl<M: RpcMethod> RelayRequest<M> {
    /// New pending unit using the method's own timeout.
    pub fn new(channel: SecureChannel, timers: Arc<dyn TimerService>, id: CorrelationId) -> Self {
        Self::with_timeout(channel, timers, id, M::TIMEOUT)
    }

    /// New pending unit with an explicit timeout.
    pub fn with_timeout(
        channel: SecureChannel,
        timers: Arc<dyn TimerService>,
        id: CorrelationId,
        timeout: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(UnitShared {
                id,
                channel,
                timers,
                timeout,
                state: Mutex::new(UnitState {
                    phase: RequestState::Pending,
                    dispatched: false,
                    disposed: false,
                    settle: None,
                    listener: None,
                    timer: None,
                }),
                _method: PhantomData,
            }),
        }
    }

    pub fn id(&self) -> &CorrelationId {
        &self.shared.id
    }

    pub fn timeout(&self) -> Duration {
        self.shared.timeout
    }

    pub fn state(&self) -> RequestState {
        self.shared.state.lock().phase
    }

    /// Whether the listener and timer have been released.
    pub fn is_disposed(&self) -> bool {
        self.shared.state.lock().disposed
    }

    /// Send the request and start waiting for its outcome.
    ///
    /// The listener and timer are in place before the message leaves, so a
    /// provider answering synchronously is still heard. A unit dispatches
    /// once: later calls reject with `RequestFailed` without sending. On a
    /// disposed channel the unit rejects with `Cancelled` at once.
    pub fn dispatch(&self, payload: M::Payload) -> RequestFuture<M::Output> {
        let shared = &self.shared;

        let receiver = {
            let mut state = shared.state.lock();
            if state.dispatched {
                return RequestFuture::ready(Err(RelayError::request_failed(
                    "request already dispatched",
                )));
            }
            if state.disposed {
                return RequestFuture::ready(Err(RelayError::cancelled()));
            }
            if shared.channel.is_disposed() {
                state.dispatched = true;
                state.disposed = true;
                state.phase = RequestState::Rejected;
                return RequestFuture::ready(Err(RelayError::cancelled()));
            }
            state.dispatched = true;
            let (settle, receiver) = oneshot::channel();
            state.settle = Some(settle);
            receiver
        };

        let message = match ProtocolMessage::request(shared.id.clone(), M::NAME, &payload) {
            Ok(message) => message,
            Err(err) => {
                shared.terminate(Some(Err(err)));
                return RequestFuture::waiting(receiver);
            }
        };

        let weak = Arc::downgrade(shared);
        let listener = shared
            .channel
            .add_listener(Arc::new(move |message: &ProtocolMessage| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_message(message);
                }
            }));

        let weak = Arc::downgrade(shared);
        let timer = shared.timers.schedule(
            shared.timeout,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.on_timeout();
                }
            }),
        );

        {
            let mut state = shared.state.lock();
            if state.disposed {
                drop(state);
                shared.channel.remove_listener(listener);
                shared.timers.cancel(timer);
                return RequestFuture::waiting(receiver);
            }
            state.listener = Some(listener);
            state.timer = Some(timer);
        }

        // Channel closed while the listener was being registered.
        if shared.channel.is_disposed() {
            shared.terminate(None);
            return RequestFuture::waiting(receiver);
        }

        trace!(id = %shared.id, method = M::NAME, "Request dispatched");
        shared.channel.send(&message);
        RequestFuture::waiting(receiver)
    }

    /// Reject a pending request with `Cancelled`.
    ///
    /// Returns `false` if it had already settled.
    pub fn cancel(&self) -> bool {
        let cancelled = self.shared.terminate(None);
        if cancelled {
            debug!(id = %self.shared.id, method = M::NAME, "Request cancelled");
        }
        cancelled
    }

    /// Release the listener and timer. Idempotent; a still pending request
    /// is rejected with `Cancelled`.
    pub fn dispose(&self) {
        self.shared.terminate(None);
    }
}

impl<M: RpcMethod> Drop for RelayRequest<M> {
    fn drop(&mut self) {
        self.shared.terminate(None);
    }
}

impl<M: RpcMethod> fmt::Debug for RelayRequest<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("RelayRequest")
            .field("id", &self.shared.id)
            .field("method", &M::NAME)
            .field("state", &state.phase)
            .field("disposed", &state.disposed)
            .finish()
    }
}

enum FutureInner<T> {
    Waiting(oneshot::Receiver<RelayResult<T>>),
    Ready(Option<RelayResult<T>>),
}

/// Outcome of a dispatched request. Resolves exactly once.
pub struct RequestFuture<T> {
    inner: FutureInner<T>,
}

impl<T> RequestFuture<T> {
    fn waiting(receiver: oneshot::Receiver<RelayResult<T>>) -> Self {
        Self {
            inner: FutureInner::Waiting(receiver),
        }
    }

    fn ready(result: RelayResult<T>) -> Self {
        Self {
            inner: FutureInner::Ready(Some(result)),
        }
    }
}

// Never pinned structurally.
impl<T> Unpin for RequestFuture<T> {}

impl<T> Future for RequestFuture<T> {
    type Output = RelayResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().inner {
            FutureInner::Waiting(receiver) => Pin::new(receiver)
                .poll(cx)
                .map(|received| received.unwrap_or_else(|_| Err(RelayError::cancelled()))),
            FutureInner::Ready(result) => Poll::Ready(result.take().unwrap_or_else(|| {
                Err(RelayError::request_failed("request future polled after completion"))
            })),
        }
    }
}
