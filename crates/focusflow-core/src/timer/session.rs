//! Session timer (focus mode).
//!
//! A three-kind state machine layered on a [`Countdown`]. Kinds can only be
//! switched by hand while idle; on completion Focus flips to ShortBreak and
//! any break flips back to Focus. The next session is never auto-started.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::countdown::{Countdown, TickOutcome};
use super::kind::{SessionDurations, SessionKind};
use super::scheduler::{TickHandle, TickScheduler};
use super::transition::Transition;
use crate::error::TimerError;
use crate::events::{Event, TimerId};
use crate::tasks::{self, TaskRef};

/// Everything a view needs to render the session timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub kind: SessionKind,
    pub remaining_secs: u32,
    pub duration_secs: u32,
    pub is_running: bool,
    /// Running and in Focus: the shell should hide its chrome.
    pub immersive: bool,
    pub selected_task: Option<String>,
}

impl SessionSnapshot {
    /// 0.0 .. 1.0 progress within the current session.
    pub fn progress(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / self.duration_secs as f64)
    }
}

pub type SessionTransition = Transition<SessionSnapshot>;

#[derive(Debug)]
pub struct SessionTimer<S: TickScheduler> {
    kind: SessionKind,
    durations: SessionDurations,
    countdown: Countdown<S>,
    selected_task: Option<String>,
}

impl<S: TickScheduler> SessionTimer<S> {
    /// Mount a timer in Focus, idle, with the full focus duration.
    pub fn new(durations: SessionDurations, scheduler: S) -> Self {
        Self::with_kind(durations, SessionKind::Focus, scheduler)
    }

    pub fn with_kind(durations: SessionDurations, kind: SessionKind, scheduler: S) -> Self {
        Self {
            kind,
            durations,
            countdown: Countdown::new(durations.get(kind), scheduler),
            selected_task: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn durations(&self) -> SessionDurations {
        self.durations
    }

    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn immersive(&self) -> bool {
        self.is_running() && self.kind == SessionKind::Focus
    }

    pub fn pending(&self) -> Option<TickHandle> {
        self.countdown.pending()
    }

    pub fn scheduler(&self) -> &S {
        self.countdown.scheduler()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            kind: self.kind,
            remaining_secs: self.remaining_secs(),
            duration_secs: self.durations.get(self.kind),
            is_running: self.is_running(),
            immersive: self.immersive(),
            selected_task: self.selected_task.clone(),
        }
    }

    /// Resolve the selected task against the caller's current task list.
    pub fn selected_task<'a>(&self, tasks: &'a [TaskRef]) -> Option<&'a TaskRef> {
        let id = self.selected_task.as_deref()?;
        tasks::find_open(tasks, id)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> SessionTransition {
        let was_immersive = self.immersive();
        let mut events = Vec::new();
        if self.countdown.start() {
            events.push(Event::TimerStarted {
                timer: TimerId::Session,
                remaining_secs: self.remaining_secs(),
                at: Utc::now(),
            });
        }
        self.finish(was_immersive, events)
    }

    pub fn pause(&mut self) -> SessionTransition {
        let was_immersive = self.immersive();
        let mut events = Vec::new();
        if self.countdown.pause() {
            events.push(Event::TimerPaused {
                timer: TimerId::Session,
                remaining_secs: self.remaining_secs(),
                at: Utc::now(),
            });
        }
        self.finish(was_immersive, events)
    }

    /// The play/pause button.
    pub fn toggle(&mut self) -> SessionTransition {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> SessionTransition {
        let was_immersive = self.immersive();
        self.countdown.reset(self.durations.get(self.kind));
        let events = vec![Event::TimerReset {
            timer: TimerId::Session,
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        }];
        self.finish(was_immersive, events)
    }

    /// Switch kind by hand. Refused while running; selecting the active kind
    /// changes nothing.
    pub fn select_kind(&mut self, kind: SessionKind) -> Result<SessionTransition, TimerError> {
        if self.is_running() {
            return Err(TimerError::KindLocked {
                requested: kind,
                active: self.kind,
            });
        }
        let mut events = Vec::new();
        if kind != self.kind {
            events.push(self.switch_kind(kind, false));
        }
        Ok(self.finish(false, events))
    }

    /// Change the configured length of `kind`, clamped to [1, 180] minutes.
    ///
    /// The visible countdown follows only when `kind` is active and idle;
    /// otherwise the new length applies at that kind's next reset.
    pub fn set_duration(&mut self, kind: SessionKind, minutes: u32) -> SessionTransition {
        let was_immersive = self.immersive();
        let secs = self.durations.set_minutes(kind, minutes);
        if kind == self.kind {
            self.countdown.set_idle_remaining(secs);
        }
        let events = vec![Event::DurationChanged {
            timer: TimerId::Session,
            kind: Some(kind),
            duration_secs: secs,
            at: Utc::now(),
        }];
        self.finish(was_immersive, events)
    }

    /// Pick the task to focus on. Ids that are not open tasks clear the
    /// selection. Returns the resolved task.
    pub fn select_task<'a>(&mut self, id: Option<&str>, tasks: &'a [TaskRef]) -> Option<&'a TaskRef> {
        let task = id.and_then(|id| tasks::find_open(tasks, id));
        self.selected_task = task.map(|t| t.id.clone());
        task
    }

    /// Apply one tick delivered under `handle`.
    pub fn tick(&mut self, handle: TickHandle) -> SessionTransition {
        let was_immersive = self.immersive();
        let mut events = Vec::new();
        if self.countdown.tick(handle) == TickOutcome::Completed {
            let completed = self.kind;
            let next = completed.next_after_completion();
            info!(kind = %completed, next = %next, "session completed");
            events.push(Event::SessionCompleted {
                kind: completed,
                next,
                at: Utc::now(),
            });
            events.push(self.switch_kind(next, true));
        }
        self.finish(was_immersive, events)
    }

    /// Stop ticking because the owning view went away.
    ///
    /// A running Focus session leaves immersive mode here, so the returned
    /// transition carries `ImmersiveChanged { active: false }` for the shell.
    pub fn teardown(&mut self) -> SessionTransition {
        let was_immersive = self.immersive();
        self.countdown.teardown();
        self.finish(was_immersive, Vec::new())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn switch_kind(&mut self, to: SessionKind, automatic: bool) -> Event {
        let from = self.kind;
        self.kind = to;
        let duration_secs = self.durations.get(to);
        self.countdown.reset(duration_secs);
        info!(from = %from, to = %to, automatic, "session kind changed");
        Event::KindChanged {
            from,
            to,
            automatic,
            duration_secs,
            at: Utc::now(),
        }
    }

    fn finish(&self, was_immersive: bool, mut events: Vec<Event>) -> SessionTransition {
        let now_immersive = self.immersive();
        if now_immersive != was_immersive {
            events.push(Event::ImmersiveChanged {
                active: now_immersive,
                at: Utc::now(),
            });
        }
        Transition::new(self.snapshot(), events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::scheduler::ManualScheduler;

    fn timer(focus: u32, short: u32, long: u32) -> SessionTimer<ManualScheduler> {
        SessionTimer::new(SessionDurations::new(focus, short, long), ManualScheduler::new())
    }

    fn advance(t: &mut SessionTimer<ManualScheduler>, secs: u32) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..secs {
            for h in t.scheduler().due() {
                events.extend(t.tick(h).events);
            }
        }
        events
    }

    #[test]
    fn mounts_idle_in_focus() {
        let t = SessionTimer::new(SessionDurations::default(), ManualScheduler::new());
        let snap = t.snapshot();
        assert_eq!(snap.kind, SessionKind::Focus);
        assert_eq!(snap.remaining_secs, 25 * 60);
        assert!(!snap.is_running);
        assert!(!snap.immersive);
        assert_eq!(snap.progress(), 0.0);
    }

    #[test]
    fn focus_completion_switches_to_short_break_paused() {
        let mut t = timer(2, 300, 900);
        t.start();
        let events = advance(&mut t, 2);

        let snap = t.snapshot();
        assert_eq!(snap.kind, SessionKind::ShortBreak);
        assert_eq!(snap.remaining_secs, 300);
        assert!(!snap.is_running);
        assert_eq!(
            events.iter().filter(|e| e.is_completion()).count(),
            1
        );
        assert!(events.iter().any(|e| matches!(
            e,
            Event::KindChanged { from: SessionKind::Focus, to: SessionKind::ShortBreak, automatic: true, .. }
        )));
        assert!(events.iter().any(|e| matches!(e, Event::ImmersiveChanged { active: false, .. })));
    }

    #[test]
    fn break_completion_returns_to_focus() {
        let mut t = SessionTimer::with_kind(
            SessionDurations::new(1500, 3, 900),
            SessionKind::ShortBreak,
            ManualScheduler::new(),
        );
        t.start();
        advance(&mut t, 3);
        assert_eq!(t.kind(), SessionKind::Focus);
        assert_eq!(t.remaining_secs(), 1500);
        assert!(!t.is_running());
    }

    #[test]
    fn long_break_completion_returns_to_focus() {
        let mut t = timer(1500, 300, 2);
        t.select_kind(SessionKind::LongBreak).unwrap();
        t.start();
        advance(&mut t, 2);
        assert_eq!(t.kind(), SessionKind::Focus);
    }

    #[test]
    fn kind_change_rejected_while_running() {
        let mut t = timer(60, 30, 90);
        t.start();
        let err = t.select_kind(SessionKind::LongBreak).unwrap_err();
        assert_eq!(
            err,
            TimerError::KindLocked {
                requested: SessionKind::LongBreak,
                active: SessionKind::Focus
            }
        );
        assert_eq!(t.kind(), SessionKind::Focus);
        assert!(t.is_running());
    }

    #[test]
    fn kind_change_while_idle_resets_remaining() {
        let mut t = timer(60, 30, 90);
        t.start();
        advance(&mut t, 10);
        t.pause();
        let tr = t.select_kind(SessionKind::LongBreak).unwrap();
        assert_eq!(tr.snapshot.kind, SessionKind::LongBreak);
        assert_eq!(tr.snapshot.remaining_secs, 90);
        assert!(!tr.snapshot.is_running);
    }

    #[test]
    fn selecting_active_kind_is_noop() {
        let mut t = timer(60, 30, 90);
        t.start();
        advance(&mut t, 5);
        t.pause();
        let tr = t.select_kind(SessionKind::Focus).unwrap();
        assert!(tr.is_noop());
        assert_eq!(t.remaining_secs(), 55);
    }

    #[test]
    fn immersive_only_when_running_focus() {
        let mut t = timer(60, 30, 90);
        assert!(!t.immersive());

        let tr = t.start();
        assert!(tr.snapshot.immersive);
        assert!(tr.events.iter().any(|e| matches!(e, Event::ImmersiveChanged { active: true, .. })));

        let tr = t.pause();
        assert!(!tr.snapshot.immersive);

        t.select_kind(SessionKind::ShortBreak).unwrap();
        let tr = t.start();
        assert!(tr.snapshot.is_running);
        assert!(!tr.snapshot.immersive);
        assert!(!tr.events.iter().any(|e| matches!(e, Event::ImmersiveChanged { .. })));
    }

    #[test]
    fn toggle_starts_then_pauses() {
        let mut t = timer(60, 30, 90);
        assert!(t.toggle().snapshot.is_running);
        assert!(!t.toggle().snapshot.is_running);
    }

    #[test]
    fn reset_restores_kind_duration() {
        let mut t = timer(60, 30, 90);
        t.start();
        advance(&mut t, 7);
        let tr = t.reset();
        assert_eq!(tr.snapshot.remaining_secs, 60);
        assert!(!tr.snapshot.is_running);
        assert_eq!(t.scheduler().active_count(), 0);
    }

    #[test]
    fn set_duration_syncs_idle_active_kind() {
        let mut t = timer(60, 30, 90);
        let tr = t.set_duration(SessionKind::Focus, 50);
        assert_eq!(tr.snapshot.remaining_secs, 50 * 60);
        assert_eq!(tr.snapshot.duration_secs, 50 * 60);
    }

    #[test]
    fn set_duration_clamps() {
        let mut t = timer(60, 30, 90);
        assert_eq!(t.set_duration(SessionKind::Focus, 0).snapshot.remaining_secs, 60);
        assert_eq!(t.set_duration(SessionKind::Focus, 999).snapshot.remaining_secs, 180 * 60);
    }

    #[test]
    fn set_duration_of_other_kind_waits_for_selection() {
        let mut t = timer(60, 30, 90);
        t.set_duration(SessionKind::ShortBreak, 10);
        assert_eq!(t.remaining_secs(), 60);
        t.select_kind(SessionKind::ShortBreak).unwrap();
        assert_eq!(t.remaining_secs(), 600);
    }

    #[test]
    fn set_duration_while_running_keeps_countdown() {
        let mut t = timer(60, 30, 90);
        t.start();
        advance(&mut t, 3);
        t.set_duration(SessionKind::Focus, 40);
        assert_eq!(t.remaining_secs(), 57);
        assert!(t.is_running());
        t.reset();
        assert_eq!(t.remaining_secs(), 40 * 60);
    }

    #[test]
    fn stale_tick_after_pause_changes_nothing() {
        let mut t = timer(60, 30, 90);
        t.start();
        let handle = t.pending().unwrap();
        t.pause();
        let tr = t.tick(handle);
        assert!(tr.is_noop());
        assert_eq!(t.remaining_secs(), 60);
    }

    #[test]
    fn select_task_resolves_open_tasks_only() {
        let tasks = vec![
            TaskRef { id: "1".into(), title: "Draft".into(), completed: false },
            TaskRef { id: "2".into(), title: "Done".into(), completed: true },
        ];
        let mut t = timer(60, 30, 90);
        assert_eq!(t.select_task(Some("1"), &tasks).map(|t| t.title.as_str()), Some("Draft"));
        assert_eq!(t.snapshot().selected_task.as_deref(), Some("1"));
        assert!(t.select_task(Some("2"), &tasks).is_none());
        assert!(t.selected_task(&tasks).is_none());
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn teardown_cancels_pending_tick() {
        let mut t = timer(60, 30, 90);
        t.start();
        t.teardown();
        assert_eq!(t.scheduler().active_count(), 0);
        assert!(!t.is_running());
    }

    #[test]
    fn teardown_of_running_focus_leaves_immersive_mode() {
        let mut t = timer(60, 30, 90);
        let started = t.start();
        assert!(started.events.iter().any(|e| matches!(e, Event::ImmersiveChanged { active: true, .. })));

        let tr = t.teardown();
        assert!(!t.immersive());
        assert!(!tr.snapshot.immersive);
        assert_eq!(
            tr.events
                .iter()
                .filter(|e| matches!(e, Event::ImmersiveChanged { active: false, .. }))
                .count(),
            1
        );
    }

    #[test]
    fn teardown_when_not_immersive_emits_nothing() {
        let mut t = timer(60, 30, 90);
        assert!(t.teardown().is_noop());

        t.select_kind(SessionKind::ShortBreak).unwrap();
        t.start();
        assert!(t.teardown().is_noop());
        assert!(!t.is_running());
    }
}
