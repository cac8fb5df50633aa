use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::SessionKind;

/// Which of the two independent timers produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerId {
    Session,
    Rest,
}

/// Every state change of a timer produces an Event.
/// The effect dispatcher turns completions into toasts, notifications and tones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        timer: TimerId,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        timer: TimerId,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        timer: TimerId,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// A configured duration changed (after clamping).
    DurationChanged {
        timer: TimerId,
        kind: Option<SessionKind>,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// Session timer switched kind, either by the user or after completion.
    KindChanged {
        from: SessionKind,
        to: SessionKind,
        automatic: bool,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// A session-timer countdown reached zero.
    SessionCompleted {
        kind: SessionKind,
        next: SessionKind,
        at: DateTime<Utc>,
    },
    /// The rest countdown reached zero and was re-armed.
    RestCompleted {
        max_secs: u32,
        at: DateTime<Utc>,
    },
    /// Immersive mode flipped.
    ImmersiveChanged {
        active: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Event::SessionCompleted { .. } | Event::RestCompleted { .. }
        )
    }
}
