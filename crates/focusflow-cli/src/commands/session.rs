use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use focusflow_core::tasks::load_tasks;
use focusflow_core::{
    Config, EffectDispatcher, ManualScheduler, SessionKind, SessionTimer, TaskRef,
    TickScheduler, TokioScheduler,
};
use tokio::runtime::Handle;
use tracing::info;

use super::emit;
use crate::presenters::{draw_countdown, ChromeBanner, DesktopNotifier, TermToaster, TerminalBell};

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Focus,
    ShortBreak,
    LongBreak,
}

impl From<KindArg> for SessionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Focus => SessionKind::Focus,
            KindArg::ShortBreak => SessionKind::ShortBreak,
            KindArg::LongBreak => SessionKind::LongBreak,
        }
    }
}

#[derive(Args)]
pub struct DurationOverrides {
    /// Focus length in minutes (1-180)
    #[arg(long)]
    focus_minutes: Option<u32>,
    /// Short break length in minutes (1-180)
    #[arg(long)]
    short_break_minutes: Option<u32>,
    /// Long break length in minutes (1-180)
    #[arg(long)]
    long_break_minutes: Option<u32>,
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run the session timer in real time
    Run {
        /// Kind to start with
        #[arg(long, value_enum, default_value = "focus")]
        kind: KindArg,
        /// Task id to focus on
        #[arg(long)]
        task: Option<String>,
        /// Task export from the dashboard (JSON array)
        #[arg(long)]
        tasks: Option<PathBuf>,
        /// Number of sessions to run back to back. Each follow-up session is
        /// started as if the user pressed start once the previous one ended
        #[arg(long, default_value = "1")]
        cycles: u32,
        #[command(flatten)]
        durations: DurationOverrides,
    },
    /// Print the state a freshly mounted timer would show
    Status {
        #[arg(long, value_enum, default_value = "focus")]
        kind: KindArg,
        #[command(flatten)]
        durations: DurationOverrides,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    match action {
        SessionAction::Status { kind, durations } => {
            let mut timer =
                SessionTimer::with_kind(config.session_durations(), kind.into(), ManualScheduler::new());
            apply_overrides(&mut timer, &durations);
            println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
            Ok(())
        }
        SessionAction::Run {
            kind,
            task,
            tasks,
            cycles,
            durations,
        } => {
            let task_list = match tasks {
                Some(path) => load_tasks(&path)?,
                None => Vec::new(),
            };
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_sessions(
                &config,
                kind.into(),
                task.as_deref(),
                &task_list,
                cycles.max(1),
                &durations,
            ))
        }
    }
}

fn apply_overrides<S: TickScheduler>(timer: &mut SessionTimer<S>, overrides: &DurationOverrides) {
    let pairs = [
        (SessionKind::Focus, overrides.focus_minutes),
        (SessionKind::ShortBreak, overrides.short_break_minutes),
        (SessionKind::LongBreak, overrides.long_break_minutes),
    ];
    for (kind, minutes) in pairs {
        if let Some(minutes) = minutes {
            timer.set_duration(kind, minutes);
        }
    }
}

async fn run_sessions(
    config: &Config,
    kind: SessionKind,
    task: Option<&str>,
    tasks: &[TaskRef],
    cycles: u32,
    overrides: &DurationOverrides,
) -> Result<(), Box<dyn std::error::Error>> {
    let (scheduler, mut ticks) = TokioScheduler::new(Handle::current());
    let mut timer = SessionTimer::with_kind(config.session_durations(), kind, scheduler);
    apply_overrides(&mut timer, overrides);

    if task.is_some() {
        match timer.select_task(task, tasks) {
            Some(t) => eprintln!("Focusing on: \"{}\"", t.title),
            None => eprintln!("Task not found among open tasks; running without one."),
        }
    }

    let mut effects = EffectDispatcher::new(Box::new(TermToaster))
        .with_notifier(Box::new(DesktopNotifier::detect()))
        .with_sound(Box::new(TerminalBell { tone_out: None }))
        .with_immersive_sink(Box::new(ChromeBanner))
        .with_tone(config.tone())
        .notifications_enabled(config.notifications.enabled);

    let mut completed = 0;
    let started = timer.start();
    emit(&started.events)?;
    effects.dispatch(&started.events);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                let paused = timer.pause();
                emit(&paused.events)?;
                effects.dispatch(&paused.events);
                info!("interrupted, tearing down session timer");
                break;
            }
            handle = ticks.recv() => {
                let Some(handle) = handle else {
                    return Err("tick channel closed".into());
                };
                let transition = timer.tick(handle);
                if transition.is_noop() {
                    draw_countdown(transition.snapshot.kind.label(), transition.snapshot.remaining_secs);
                    continue;
                }
                emit(&transition.events)?;
                effects.dispatch(&transition.events);

                if transition.completions() > 0 {
                    completed += 1;
                    if completed >= cycles {
                        break;
                    }
                    // Stands in for the user pressing start on the next session.
                    let next = timer.start();
                    emit(&next.events)?;
                    effects.dispatch(&next.events);
                }
            }
        }
    }

    let torn_down = timer.teardown();
    emit(&torn_down.events)?;
    effects.dispatch(&torn_down.events);
    eprintln!();
    println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
    Ok(())
}
