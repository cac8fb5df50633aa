use std::path::PathBuf;

use clap::Subcommand;
use focusflow_core::{Config, EffectDispatcher, RestTimer, TokioScheduler};
use tokio::runtime::Handle;
use tracing::info;

use super::emit;
use crate::presenters::{draw_countdown, TermToaster, TerminalBell};

#[derive(Subcommand)]
pub enum RestAction {
    /// Count down rest periods between sets
    Run {
        /// Rest length in seconds (5-600); defaults to rest.max_seconds
        #[arg(long)]
        max: Option<u32>,
        /// Number of rest periods to run
        #[arg(long, default_value = "1")]
        sets: u32,
        /// Also write the alert tone to this WAV file
        #[arg(long)]
        tone_out: Option<PathBuf>,
    },
}

pub fn run(action: RestAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    match action {
        RestAction::Run { max, sets, tone_out } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_rest(&config, max, sets.max(1), tone_out))
        }
    }
}

async fn run_rest(
    config: &Config,
    max: Option<u32>,
    sets: u32,
    tone_out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (scheduler, mut ticks) = TokioScheduler::new(Handle::current());
    let mut timer = RestTimer::new(config.rest_max_secs(), scheduler);
    if let Some(max) = max {
        let changed = timer.set_max_duration(max);
        emit(&changed.events)?;
    }

    let mut effects = EffectDispatcher::new(Box::new(TermToaster))
        .with_sound(Box::new(TerminalBell { tone_out }))
        .with_tone(config.tone())
        .notifications_enabled(config.notifications.enabled);

    let mut done = 0;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while done < sets {
        eprintln!("Rest {}/{sets}", done + 1);
        let started = timer.start();
        emit(&started.events)?;

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    let paused = timer.pause();
                    emit(&paused.events)?;
                    info!("interrupted, tearing down rest timer");
                    timer.teardown();
                    eprintln!();
                    println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
                    return Ok(());
                }
                handle = ticks.recv() => {
                    let Some(handle) = handle else {
                        return Err("tick channel closed".into());
                    };
                    let transition = timer.tick(handle);
                    if transition.is_noop() {
                        draw_countdown("Rest", transition.snapshot.remaining_secs);
                        continue;
                    }
                    emit(&transition.events)?;
                    effects.dispatch(&transition.events);
                    if transition.completions() > 0 {
                        done += 1;
                        break;
                    }
                }
            }
        }
    }

    timer.teardown();
    println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
    Ok(())
}
