//! End-to-end timer scenarios: manual ticking and real tokio delivery.

use std::time::Duration;

use focusflow_core::effects::{Toaster, Toast};
use focusflow_core::{
    EffectDispatcher, Event, ManualScheduler, RestTimer, SessionDurations, SessionKind,
    SessionTimer, TokioScheduler,
};
use tokio::runtime::Handle;

#[test]
fn two_second_focus_flips_to_short_break() {
    let mut timer = SessionTimer::new(SessionDurations::new(2, 300, 900), ManualScheduler::new());
    timer.start();

    let mut events = Vec::new();
    for _ in 0..2 {
        for h in timer.scheduler().due() {
            events.extend(timer.tick(h).events);
        }
    }

    let snap = timer.snapshot();
    assert_eq!(snap.kind, SessionKind::ShortBreak);
    assert_eq!(snap.remaining_secs, 300);
    assert!(!snap.is_running);
    assert_eq!(events.iter().filter(|e| e.is_completion()).count(), 1);
}

#[test]
fn paused_rest_timer_ignores_later_ticks() {
    let mut rest = RestTimer::new(10, ManualScheduler::new());
    rest.start();
    let handle = rest.pending().unwrap();
    for _ in 0..4 {
        rest.tick(handle);
    }
    rest.pause();
    assert_eq!(rest.remaining_secs(), 6);

    for _ in 0..100 {
        rest.tick(handle);
        for h in rest.scheduler().due() {
            rest.tick(h);
        }
    }
    assert_eq!(rest.remaining_secs(), 6);
}

#[test]
fn idle_slider_change_updates_display() {
    let mut rest = RestTimer::new(60, ManualScheduler::new());
    rest.set_max_duration(90);
    assert_eq!(rest.remaining_secs(), 90);
}

#[test]
fn timers_are_independent() {
    let mut session = SessionTimer::new(SessionDurations::new(5, 5, 5), ManualScheduler::new());
    let mut rest = RestTimer::new(10, ManualScheduler::new());
    session.start();
    rest.start();
    let rest_handle = rest.pending().unwrap();

    session.pause();
    rest.tick(rest_handle);
    assert_eq!(session.remaining_secs(), 5);
    assert_eq!(rest.remaining_secs(), 9);
}

struct CountingToaster(std::rc::Rc<std::cell::Cell<usize>>);

impl Toaster for CountingToaster {
    fn show(&mut self, _toast: Toast) {
        self.0.set(self.0.get() + 1);
    }
}

#[tokio::test(start_paused = true)]
async fn rest_timer_runs_on_tokio_ticks() {
    let (scheduler, mut rx) = TokioScheduler::new(Handle::current());
    let mut rest = RestTimer::new(5, scheduler);
    let toasts = std::rc::Rc::new(std::cell::Cell::new(0));
    let mut effects = EffectDispatcher::new(Box::new(CountingToaster(toasts.clone())));

    rest.start();
    let mut completed = false;
    while !completed {
        let handle = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("tick arrives within a period")
            .expect("channel open");
        let transition = rest.tick(handle);
        effects.dispatch(&transition.events);
        completed = transition
            .events
            .iter()
            .any(|e| matches!(e, Event::RestCompleted { .. }));
    }

    assert_eq!(rest.remaining_secs(), 5);
    assert!(!rest.is_running());
    assert_eq!(rest.scheduler().active_count(), 0);
    assert_eq!(toasts.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn no_zombie_ticks_after_pause_on_tokio() {
    let (scheduler, mut rx) = TokioScheduler::new(Handle::current());
    let mut session = SessionTimer::new(SessionDurations::new(60, 60, 60), scheduler);

    session.start();
    for _ in 0..3 {
        let handle = rx.recv().await.expect("channel open");
        session.tick(handle);
    }
    session.pause();
    assert_eq!(session.remaining_secs(), 57);

    // Whatever is still queued or arrives later is stale.
    tokio::time::sleep(Duration::from_secs(30)).await;
    while let Ok(handle) = rx.try_recv() {
        assert!(session.tick(handle).is_noop());
    }
    assert_eq!(session.remaining_secs(), 57);
}
