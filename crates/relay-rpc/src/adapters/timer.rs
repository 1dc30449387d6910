//! Tokio-backed timer service.

use crate::ports::{TimerCallback, TimerHandle, TimerService};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::trace;

/// Errors from timer construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// No tokio runtime is running on this thread.
    #[error("No tokio runtime available: {0}")]
    NoRuntime(String),
}

/// Timer service spawning one sleeping task per timer.
#[derive(Clone)]
pub struct TokioTimerService {
    runtime: Handle,
    tasks: Arc<Mutex<HashMap<TimerHandle, AbortHandle>>>,
    next_id: Arc<AtomicU64>,
}

impl TokioTimerService {
    /// Timer service on an explicit runtime.
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            tasks: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Timer service on the runtime of the calling thread.
    pub fn try_current() -> Result<Self, TimerError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| TimerError::NoRuntime(e.to_string()))
    }

    /// Number of timers scheduled and not yet elapsed or cancelled.
    pub fn active_count(&self) -> usize {
        self.tasks.lock().len()
    }
}

impl TimerService for TokioTimerService {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = TimerHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let tasks = Arc::clone(&self.tasks);

        // Held across spawn so the task cannot deregister before it is
        // registered.
        let mut registered = self.tasks.lock();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if tasks.lock().remove(&handle).is_some() {
                trace!(timer = %handle, "Timer elapsed");
                callback();
            }
        });
        registered.insert(handle, task.abort_handle());
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(task) = self.tasks.lock().remove(&handle) {
            task.abort();
            trace!(timer = %handle, "Timer cancelled");
        }
    }
}
