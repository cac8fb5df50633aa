//! # FocusFlow Core Library
//!
//! The timer subsystem of the FocusFlow productivity dashboard: a Pomodoro
//! session timer and a workout rest countdown, both built on one countdown
//! engine. The CLI binary and any GUI shell are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: decrements once per delivered tick. Ticks come from
//!   an injected [`TickScheduler`] and carry a [`TickHandle`]; stale handles
//!   are ignored, so nothing changes after `pause()` or `reset()` returns
//! - **Timers**: [`SessionTimer`] (Focus / Short Break / Long Break) and
//!   [`RestTimer`]. Every command returns a [`Transition`]: the new snapshot
//!   plus the [`Event`]s it produced
//! - **Effects**: [`EffectDispatcher`] turns completion events into toasts,
//!   system notifications and a generated tone, swallowing their failures
//! - **Runtime**: [`TokioScheduler`] delivers real one-second ticks
//! - **Storage**: TOML-based duration and alert preferences

pub mod effects;
pub mod error;
pub mod events;
pub mod runtime;
pub mod storage;
pub mod tasks;
pub mod timer;

pub use effects::{EffectDispatcher, EffectReport, NotificationPermission, SoundPreset, Toast, Tone};
pub use error::{ConfigError, CoreError, TimerError, ValidationError};
pub use events::{Event, TimerId};
pub use runtime::{TickReceiver, TokioScheduler};
pub use storage::Config;
pub use tasks::TaskRef;
pub use timer::{
    ManualScheduler, RestSnapshot, RestTimer, SessionDurations, SessionKind, SessionSnapshot,
    SessionTimer, TickHandle, TickScheduler, Transition,
};
