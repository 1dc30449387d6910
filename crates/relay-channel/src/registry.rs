//! # Listener Registry
//!
//! Ordered subscribe/unsubscribe registry with snapshot-before-fan-out
//! delivery. The lock is released before any listener runs, so listeners may
//! add or remove themselves or their siblings while a fan-out is in progress.
//! Every listener registered when the fan-out started receives the event
//! exactly once.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A registered callback.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Handle identifying a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Registry of listeners for events of type `E`.
pub struct ListenerRegistry<E> {
    listeners: Mutex<Vec<(ListenerId, Listener<E>)>>,
    next_id: AtomicU64,
}

impl<E> ListenerRegistry<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a listener at the end of the delivery order.
    pub fn add(&self, listener: Listener<E>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, listener));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.lock().iter().any(|(existing, _)| *existing == id)
    }

    pub fn clear(&self) {
        self.listeners.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current listeners in registration order.
    pub fn snapshot(&self) -> Vec<Listener<E>> {
        self.listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }

    /// Deliver `event` to every listener registered at call time.
    ///
    /// `keep_going` is consulted before each listener; fan-out stops as soon
    /// as it returns false. Returns the number of listeners invoked.
    pub fn fan_out(&self, event: &E, keep_going: impl Fn() -> bool) -> usize {
        let mut delivered = 0;
        for listener in self.snapshot() {
            if !keep_going() {
                break;
            }
            listener(event);
            delivered += 1;
        }
        delivered
    }
}

impl<E> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}
