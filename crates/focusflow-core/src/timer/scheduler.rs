//! Tick scheduling.
//!
//! A countdown never owns a closure over its own state. Instead it asks a
//! [`TickScheduler`] for a recurring tick and receives an opaque
//! [`TickHandle`]. Whoever drives the scheduler feeds the handle back into
//! `tick()`, and the countdown ignores any handle that is no longer its
//! pending one.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifier of one scheduled recurring tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Host facility for recurring callbacks.
pub trait TickScheduler {
    /// Begin delivering a tick every `period`. Returns a fresh handle.
    fn schedule_every(&mut self, period: Duration) -> TickHandle;

    /// Stop delivering ticks for `handle`. Cancelling an unknown or already
    /// cancelled handle is a no-op.
    fn cancel(&mut self, handle: TickHandle);
}

/// Deterministic scheduler driven by hand.
///
/// Used by tests and by simulations. `due()` lists the handles that would
/// fire if one period elapsed now.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    next_id: u64,
    active: BTreeSet<TickHandle>,
    scheduled_total: u64,
    cancelled_total: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles that are currently scheduled.
    pub fn due(&self) -> Vec<TickHandle> {
        self.active.iter().copied().collect()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, handle: TickHandle) -> bool {
        self.active.contains(&handle)
    }

    pub fn scheduled_total(&self) -> u64 {
        self.scheduled_total
    }

    pub fn cancelled_total(&self) -> u64 {
        self.cancelled_total
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_every(&mut self, _period: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.active.insert(handle);
        self.scheduled_total += 1;
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if self.active.remove(&handle) {
            self.cancelled_total += 1;
        }
    }
}
