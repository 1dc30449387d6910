//! # Transport Binding Port
//!
//! The broadcast, origin-tagged primitive the secure channel is built on.
//! Any code sharing the page can post to a window or observe its inbound
//! traffic, so nothing arriving through this port is trusted by itself.

use relay_types::{Origin, WindowId};
use std::sync::Arc;

/// One inbound delivery as reported by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    /// Origin claimed for the sender.
    pub origin: String,
    /// Sender window, when the transport can report it.
    pub source: Option<WindowId>,
    /// Structured message data.
    pub data: serde_json::Value,
}

impl InboundEvent {
    pub fn new(
        origin: impl Into<String>,
        source: Option<WindowId>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            origin: origin.into(),
            source,
            data,
        }
    }
}

/// Callback invoked for each inbound event.
pub type InboundHandler = Arc<dyn Fn(&InboundEvent) + Send + Sync>;

/// Handle returned when registering an inbound handler.
pub use crate::registry::ListenerId as HandlerId;

/// Transport binding for one local window.
///
/// `post` is fire-and-forget: a message whose destination origin does not
/// match the target window's actual origin is discarded by the transport,
/// and nothing is reported back to the sender.
pub trait TransportBinding: Send + Sync {
    /// The window this binding posts from and listens on.
    fn local_window(&self) -> WindowId;

    /// Post `data` to `target`, to be delivered only if the target's origin
    /// is exactly `destination_origin`.
    fn post(&self, target: WindowId, data: serde_json::Value, destination_origin: &Origin);

    /// Subscribe to inbound events of the local window.
    fn add_inbound_handler(&self, handler: InboundHandler) -> HandlerId;

    /// Unsubscribe. Unknown ids are ignored.
    fn remove_inbound_handler(&self, id: HandlerId);
}
