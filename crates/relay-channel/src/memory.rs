//! # In-Memory Page Transport
//!
//! A single-process model of a page hosting several windows of different
//! origins. Every window is reachable by anyone holding its [`WindowId`],
//! exactly like a browser's message-posting primitive; the only protection
//! the transport itself provides is the destination-origin check on `post`.
//!
//! Delivery is synchronous: handlers of the target window run inside the
//! `post` call, after all internal locks have been released.

use crate::ports::{HandlerId, InboundEvent, InboundHandler, TransportBinding};
use crate::registry::ListenerRegistry;
use parking_lot::RwLock;
use relay_types::{Origin, WindowId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Delivery counters for a page.
#[derive(Debug, Default)]
pub struct PageStats {
    /// Messages handed to `post`.
    pub posted: AtomicU64,
    /// Messages that reached the target window.
    pub delivered: AtomicU64,
    /// Messages discarded by the transport (closed target, origin mismatch).
    pub dropped: AtomicU64,
}

struct WindowSlot {
    origin: Origin,
    handlers: ListenerRegistry<InboundEvent>,
}

struct PageInner {
    windows: RwLock<HashMap<WindowId, Arc<WindowSlot>>>,
    next_window: AtomicU64,
    stats: PageStats,
}

impl PageInner {
    fn slot(&self, id: WindowId) -> Option<Arc<WindowSlot>> {
        self.windows.read().get(&id).cloned()
    }

    fn deliver(&self, target: WindowId, event: &InboundEvent) -> usize {
        let Some(slot) = self.slot(target) else {
            return 0;
        };
        slot.handlers.fan_out(event, || true)
    }
}

/// A page hosting windows that can message each other.
#[derive(Clone)]
pub struct InMemoryPage {
    inner: Arc<PageInner>,
}

impl InMemoryPage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(PageInner {
                windows: RwLock::new(HashMap::new()),
                next_window: AtomicU64::new(1),
                stats: PageStats::default(),
            }),
        }
    }

    /// Open a window with the given origin and return its transport binding.
    pub fn open_window(&self, origin: Origin) -> InMemoryWindow {
        let id = WindowId::new(self.inner.next_window.fetch_add(1, Ordering::Relaxed));
        let slot = Arc::new(WindowSlot {
            origin: origin.clone(),
            handlers: ListenerRegistry::new(),
        });
        self.inner.windows.write().insert(id, slot);
        debug!(window = %id, origin = %origin, "Window opened");
        InMemoryWindow {
            page: Arc::clone(&self.inner),
            id,
            origin,
        }
    }

    /// Close a window. Messages posted to it afterwards are dropped.
    pub fn close_window(&self, id: WindowId) -> bool {
        let removed = self.inner.windows.write().remove(&id).is_some();
        if removed {
            debug!(window = %id, "Window closed");
        }
        removed
    }

    /// Origin of an open window.
    pub fn window_origin(&self, id: WindowId) -> Option<Origin> {
        self.inner.slot(id).map(|slot| slot.origin.clone())
    }

    pub fn window_count(&self) -> usize {
        self.inner.windows.read().len()
    }

    /// Number of inbound handlers registered on a window.
    pub fn handler_count(&self, id: WindowId) -> usize {
        self.inner.slot(id).map_or(0, |slot| slot.handlers.len())
    }

    /// Deliver a forged event straight to `target`'s handlers.
    ///
    /// Models arbitrary third-party code on the page: the claimed origin,
    /// sender window and data are whatever the caller says.
    pub fn inject(&self, target: WindowId, event: InboundEvent) -> usize {
        trace!(target = %target, origin = %event.origin, "Injecting raw event");
        self.inner.deliver(target, &event)
    }

    pub fn stats(&self) -> &PageStats {
        &self.inner.stats
    }
}

impl Default for InMemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

/// Transport binding of one window on an [`InMemoryPage`].
#[derive(Clone)]
pub struct InMemoryWindow {
    page: Arc<PageInner>,
    id: WindowId,
    origin: Origin,
}

impl InMemoryWindow {
    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }
}

impl TransportBinding for InMemoryWindow {
    fn local_window(&self) -> WindowId {
        self.id
    }

    fn post(&self, target: WindowId, data: serde_json::Value, destination_origin: &Origin) {
        let stats = &self.page.stats;
        stats.posted.fetch_add(1, Ordering::Relaxed);

        let Some(slot) = self.page.slot(target) else {
            stats.dropped.fetch_add(1, Ordering::Relaxed);
            debug!(source = %self.id, target = %target, "Post dropped (target window closed)");
            return;
        };

        if slot.origin != *destination_origin {
            stats.dropped.fetch_add(1, Ordering::Relaxed);
            debug!(
                source = %self.id,
                target = %target,
                destination_origin = %destination_origin,
                "Post dropped (destination origin mismatch)"
            );
            return;
        }

        let event = InboundEvent::new(self.origin.as_str(), Some(self.id), data);
        stats.delivered.fetch_add(1, Ordering::Relaxed);
        let handlers = slot.handlers.fan_out(&event, || true);
        trace!(source = %self.id, target = %target, handlers, "Post delivered");
    }

    fn add_inbound_handler(&self, handler: InboundHandler) -> HandlerId {
        match self.page.slot(self.id) {
            Some(slot) => slot.handlers.add(handler),
            // Closed window: register on a detached registry so the id is
            // still valid to remove, but nothing will ever be delivered.
            None => ListenerRegistry::<InboundEvent>::new().add(handler),
        }
    }

    fn remove_inbound_handler(&self, id: HandlerId) {
        if let Some(slot) = self.page.slot(self.id) {
            slot.handlers.remove(id);
        }
    }
}
