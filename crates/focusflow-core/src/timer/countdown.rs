//! Countdown engine.
//!
//! A single decrementing counter advanced by one-second ticks. The engine
//! does not run threads itself: it asks its [`TickScheduler`] for a recurring
//! tick on `start()` and the driver feeds each delivered [`TickHandle`] back
//! into `tick()`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause/reset--> Idle
//!                 Running --tick to 0----> Idle (Completed reported once)
//! ```
//!
//! The engine is running exactly when it holds a pending handle. Ticks that
//! carry any other handle are stale and change nothing.

use std::time::Duration;

use tracing::debug;

use super::scheduler::{TickHandle, TickScheduler};

/// Period of one tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// What a delivered tick did to the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale or unexpected tick; nothing changed.
    Ignored,
    /// Counter decremented and is still above zero.
    Counted { remaining_secs: u32 },
    /// Counter reached zero; the engine stopped itself.
    Completed,
}

#[derive(Debug)]
pub struct Countdown<S: TickScheduler> {
    remaining_secs: u32,
    pending: Option<TickHandle>,
    scheduler: S,
}

impl<S: TickScheduler> Countdown<S> {
    pub fn new(remaining_secs: u32, scheduler: S) -> Self {
        Self {
            remaining_secs,
            pending: None,
            scheduler,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<TickHandle> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin ticking. Returns `false` when already running or at zero.
    pub fn start(&mut self) -> bool {
        if self.is_running() || self.remaining_secs == 0 {
            return false;
        }
        self.cancel_pending();
        let handle = self.scheduler.schedule_every(TICK_PERIOD);
        debug!(handle = handle.id(), remaining_secs = self.remaining_secs, "countdown started");
        self.pending = Some(handle);
        true
    }

    /// Stop ticking. Returns `false` when not running.
    pub fn pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.cancel_pending();
        debug!(remaining_secs = self.remaining_secs, "countdown paused");
        true
    }

    pub fn reset(&mut self, to_secs: u32) {
        self.cancel_pending();
        self.remaining_secs = to_secs;
    }

    /// Overwrite the counter without touching the run state.
    ///
    /// Only meaningful while idle; a running engine keeps its countdown.
    pub(crate) fn set_idle_remaining(&mut self, secs: u32) -> bool {
        if self.is_running() {
            return false;
        }
        self.remaining_secs = secs;
        true
    }

    /// Apply one elapsed second delivered under `handle`.
    pub fn tick(&mut self, handle: TickHandle) -> TickOutcome {
        if self.pending != Some(handle) {
            debug!(handle = handle.id(), "ignoring stale tick");
            return TickOutcome::Ignored;
        }
        if self.remaining_secs == 0 {
            self.cancel_pending();
            return TickOutcome::Ignored;
        }

        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            self.cancel_pending();
            debug!("countdown reached zero");
            TickOutcome::Completed
        } else {
            TickOutcome::Counted {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Stop any pending tick. Called when the owning view goes away.
    pub fn teardown(&mut self) {
        self.cancel_pending();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }
}

impl<S: TickScheduler> Drop for Countdown<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
