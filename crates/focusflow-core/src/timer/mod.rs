mod countdown;
mod kind;
mod rest;
mod scheduler;
mod session;
mod transition;

pub use countdown::{Countdown, TickOutcome, TICK_PERIOD};
pub use kind::{
    clamp_rest_secs, clamp_session_minutes, SessionDurations, SessionKind, REST_MAX_SECS,
    REST_MIN_SECS, SESSION_MAX_MINUTES, SESSION_MIN_MINUTES,
};
pub use rest::{RestSnapshot, RestTimer, RestTransition, DEFAULT_REST_SECS};
pub use scheduler::{ManualScheduler, TickHandle, TickScheduler};
pub use session::{SessionSnapshot, SessionTimer, SessionTransition};
pub use transition::Transition;
