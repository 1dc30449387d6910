//! Test doubles for the outbound ports.

use crate::ports::{TimerCallback, TimerHandle, TimerService};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::time::Duration;

struct ManualTimers {
    now: Duration,
    next_id: u64,
    // Keyed by (deadline, handle) so equal deadlines fire in scheduling order.
    pending: BTreeMap<(Duration, TimerHandle), TimerCallback>,
}

/// Timer service driven by hand. Time only moves through [`advance`].
///
/// [`advance`]: ManualTimerService::advance
pub struct ManualTimerService {
    state: Mutex<ManualTimers>,
}

impl Default for ManualTimerService {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualTimerService {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ManualTimers {
                now: Duration::ZERO,
                next_id: 1,
                pending: BTreeMap::new(),
            }),
        }
    }

    /// Time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Move time forward, firing due callbacks in deadline order.
    ///
    /// Callbacks run without the internal lock held, so they may schedule or
    /// cancel other timers. Returns the number of callbacks fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.lock().now + by;
        let mut fired = 0;

        loop {
            let due = {
                let mut state = self.state.lock();
                let next = state
                    .pending
                    .keys()
                    .next()
                    .copied()
                    .filter(|(deadline, _)| *deadline <= target);
                match next {
                    Some(key) => {
                        state.now = key.0;
                        state.pending.remove(&key)
                    }
                    None => {
                        state.now = target;
                        None
                    }
                }
            };

            match due {
                Some(callback) => {
                    callback();
                    fired += 1;
                }
                None => return fired,
            }
        }
    }
}

impl TimerService for ManualTimerService {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let mut state = self.state.lock();
        let handle = TimerHandle::new(state.next_id);
        state.next_id += 1;
        let deadline = state.now + delay;
        state.pending.insert((deadline, handle), callback);
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        self.state.lock().pending.retain(|(_, h), _| *h != handle);
    }
}
