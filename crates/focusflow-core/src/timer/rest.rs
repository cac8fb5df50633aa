//! Workout rest countdown.
//!
//! Single-kind timer between sets. When it reaches zero it reports
//! completion and re-arms itself at the configured maximum so it is ready
//! for the next set.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::countdown::{Countdown, TickOutcome};
use super::kind::clamp_rest_secs;
use super::scheduler::{TickHandle, TickScheduler};
use super::transition::Transition;
use crate::events::{Event, TimerId};

pub const DEFAULT_REST_SECS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestSnapshot {
    pub remaining_secs: u32,
    pub max_secs: u32,
    pub is_running: bool,
}

pub type RestTransition = Transition<RestSnapshot>;

#[derive(Debug)]
pub struct RestTimer<S: TickScheduler> {
    max_secs: u32,
    countdown: Countdown<S>,
}

impl<S: TickScheduler> RestTimer<S> {
    /// Mount an idle rest timer. `max_secs` is clamped to [5, 600].
    pub fn new(max_secs: u32, scheduler: S) -> Self {
        let max_secs = clamp_rest_secs(max_secs);
        Self {
            max_secs,
            countdown: Countdown::new(max_secs, scheduler),
        }
    }

    pub fn max_secs(&self) -> u32 {
        self.max_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn pending(&self) -> Option<TickHandle> {
        self.countdown.pending()
    }

    pub fn scheduler(&self) -> &S {
        self.countdown.scheduler()
    }

    pub fn snapshot(&self) -> RestSnapshot {
        RestSnapshot {
            remaining_secs: self.remaining_secs(),
            max_secs: self.max_secs,
            is_running: self.is_running(),
        }
    }

    pub fn start(&mut self) -> RestTransition {
        let mut events = Vec::new();
        if self.countdown.start() {
            events.push(Event::TimerStarted {
                timer: TimerId::Rest,
                remaining_secs: self.remaining_secs(),
                at: Utc::now(),
            });
        }
        Transition::new(self.snapshot(), events)
    }

    pub fn pause(&mut self) -> RestTransition {
        let mut events = Vec::new();
        if self.countdown.pause() {
            events.push(Event::TimerPaused {
                timer: TimerId::Rest,
                remaining_secs: self.remaining_secs(),
                at: Utc::now(),
            });
        }
        Transition::new(self.snapshot(), events)
    }

    pub fn toggle(&mut self) -> RestTransition {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> RestTransition {
        self.countdown.reset(self.max_secs);
        let events = vec![Event::TimerReset {
            timer: TimerId::Rest,
            remaining_secs: self.max_secs,
            at: Utc::now(),
        }];
        Transition::new(self.snapshot(), events)
    }

    /// Move the rest slider. While idle the display follows the new value;
    /// a running countdown is left alone and picks it up on the next reset.
    pub fn set_max_duration(&mut self, secs: u32) -> RestTransition {
        self.max_secs = clamp_rest_secs(secs);
        self.countdown.set_idle_remaining(self.max_secs);
        let events = vec![Event::DurationChanged {
            timer: TimerId::Rest,
            kind: None,
            duration_secs: self.max_secs,
            at: Utc::now(),
        }];
        Transition::new(self.snapshot(), events)
    }

    pub fn tick(&mut self, handle: TickHandle) -> RestTransition {
        let mut events = Vec::new();
        if self.countdown.tick(handle) == TickOutcome::Completed {
            info!(max_secs = self.max_secs, "rest completed");
            self.countdown.reset(self.max_secs);
            events.push(Event::RestCompleted {
                max_secs: self.max_secs,
                at: Utc::now(),
            });
        }
        Transition::new(self.snapshot(), events)
    }

    pub fn teardown(&mut self) {
        self.countdown.teardown();
    }
}
