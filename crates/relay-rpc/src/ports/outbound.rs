//! # Driven Ports (Outbound SPI)
//!
//! Services a request unit needs from its host: a timer and a source of
//! correlation ids.

use relay_types::CorrelationId;
use std::fmt;
use std::time::Duration;

/// Callback run when a timer elapses.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Handle identifying a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// One-shot timer service.
///
/// # Contract
///
/// - The callback runs at most once, no earlier than `delay` after
///   scheduling.
/// - After `cancel` returns, the callback never starts. Cancelling an
///   elapsed or unknown handle is a no-op.
/// - `schedule` never runs the callback synchronously.
pub trait TimerService: Send + Sync {
    /// Run `callback` once after `delay`.
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Cancel a scheduled timer.
    fn cancel(&self, handle: TimerHandle);
}

/// Source of correlation ids.
///
/// Ids must be unique for the lifetime of the channel they are used on.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> CorrelationId;
}
