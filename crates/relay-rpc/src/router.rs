//! Provider-side request router.
//!
//! Maps method names to typed handlers and turns each inbound `Request` into
//! exactly one `Response` or `Error` carrying the same correlation id.

use crate::domain::RpcMethod;
use parking_lot::RwLock;
use relay_channel::{ListenerId, SecureChannel};
use relay_types::{CorrelationId, ProtocolMessage, RelayError, RelayResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

type RouteHandler = Arc<dyn Fn(&CorrelationId, Value) -> ProtocolMessage + Send + Sync>;

/// Dispatches inbound requests to registered handlers.
#[derive(Default)]
pub struct RequestRouter {
    routes: RwLock<HashMap<&'static str, RouteHandler>>,
}

impl RequestRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for method `M`, replacing any previous one.
    pub fn route<M, F>(&self, handler: F)
    where
        M: RpcMethod,
        F: Fn(M::Payload) -> RelayResult<M::Output> + Send + Sync + 'static,
    {
        let route: RouteHandler = Arc::new(move |id: &CorrelationId, payload: Value| {
            let payload = match serde_json::from_value::<M::Payload>(payload) {
                Ok(payload) => payload,
                Err(e) => {
                    return ProtocolMessage::error(
                        id.clone(),
                        RelayError::malformed(format!("invalid {} payload: {e}", M::NAME)),
                    )
                }
            };

            handler(payload)
                .and_then(|output| ProtocolMessage::response(id.clone(), &output))
                .unwrap_or_else(|err| ProtocolMessage::error(id.clone(), err))
        });

        if self.routes.write().insert(M::NAME, route).is_some() {
            warn!(method = M::NAME, "Route replaced");
        }
    }

    pub fn has_route(&self, method: &str) -> bool {
        self.routes.read().contains_key(method)
    }

    /// Reply for `message`, or `None` if it is not a request.
    pub fn handle(&self, message: &ProtocolMessage) -> Option<ProtocolMessage> {
        let (id, method, payload) = match message {
            ProtocolMessage::Request {
                id,
                method,
                payload,
            } => (id, method, payload),
            ProtocolMessage::Response { .. }
            | ProtocolMessage::Error { .. }
            | ProtocolMessage::Ready => return None,
        };

        // Cloned out so handlers may register routes.
        let route = self.routes.read().get(method.as_str()).cloned();
        let reply = match route {
            Some(route) => route(id, payload.clone()),
            None => {
                debug!(%id, method = %method, "No route for method");
                ProtocolMessage::error(id.clone(), RelayError::unknown_method(method))
            }
        };
        Some(reply)
    }

    /// Answer requests arriving on `channel`.
    ///
    /// The listener holds the channel weakly; disposing or dropping the
    /// channel ends routing.
    pub fn attach(self: &Arc<Self>, channel: &SecureChannel) -> ListenerId {
        let router = Arc::clone(self);
        let weak = channel.downgrade();
        channel.add_listener(Arc::new(move |message: &ProtocolMessage| {
            if let Some(reply) = router.handle(message) {
                if let Some(channel) = weak.upgrade() {
                    channel.send(&reply);
                }
            }
        }))
    }
}

impl std::fmt::Debug for RequestRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let routes = self.routes.read();
        let mut methods: Vec<_> = routes.keys().collect();
        methods.sort();
        f.debug_struct("RequestRouter").field("methods", &methods).finish()
    }
}
