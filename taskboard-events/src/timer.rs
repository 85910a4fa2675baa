//! Single-shot poll timer
//!
//! At most one timer is armed per session at any moment. Arming while a
//! timer is pending is refused rather than stacked, and cancelling aborts
//! the pending wake before it fires.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

struct ArmedPoll {
    generation: u64,
    handle: JoinHandle<()>,
}

struct TimerState {
    armed: Mutex<Option<ArmedPoll>>,
    generation: AtomicU64,
}

impl TimerState {
    /// Disarm, but only if this wake is still the armed one; a cancel that
    /// raced the sleep wins.
    fn clear_if_current(&self, generation: u64) -> bool {
        let mut armed = self.armed.lock();
        match armed.as_ref() {
            Some(pending) if pending.generation == generation => {
                *armed = None;
                true
            }
            _ => false,
        }
    }
}

/// Guards the one-pending-wake rule for a polling session
pub(crate) struct PollTimer {
    state: Arc<TimerState>,
}

impl PollTimer {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(TimerState {
                armed: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Arm the timer. `on_fire` runs after `delay` unless cancelled first.
    ///
    /// Returns false without touching the pending wake if one is already
    /// armed.
    pub(crate) fn arm<F>(&self, delay: Duration, on_fire: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let mut armed = self.state.armed.lock();
        if armed.is_some() {
            return false;
        }

        let generation = self.state.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if state.clear_if_current(generation) {
                on_fire();
            }
        });

        *armed = Some(ArmedPoll { generation, handle });
        true
    }

    /// Cancel the pending wake, if any. Returns true if one was armed.
    pub(crate) fn cancel(&self) -> bool {
        let Some(armed) = self.state.armed.lock().take() else {
            return false;
        };
        armed.handle.abort();
        true
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.state.armed.lock().is_some()
    }
}
