use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// User-editable bounds for session durations, in minutes.
pub const SESSION_MIN_MINUTES: u32 = 1;
pub const SESSION_MAX_MINUTES: u32 = 180;

/// Bounds for the rest countdown, in seconds.
pub const REST_MIN_SECS: u32 = 5;
pub const REST_MAX_SECS: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Focus,
    ShortBreak,
    LongBreak,
}

impl SessionKind {
    pub const ALL: [SessionKind; 3] = [
        SessionKind::Focus,
        SessionKind::ShortBreak,
        SessionKind::LongBreak,
    ];

    /// Kind that follows a completed session of this kind.
    ///
    /// Long breaks are never reached automatically.
    pub fn next_after_completion(self) -> SessionKind {
        match self {
            SessionKind::Focus => SessionKind::ShortBreak,
            SessionKind::ShortBreak | SessionKind::LongBreak => SessionKind::Focus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Focus => "Focus",
            SessionKind::ShortBreak => "Short Break",
            SessionKind::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SessionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "focus" => Ok(SessionKind::Focus),
            "short_break" | "shortbreak" => Ok(SessionKind::ShortBreak),
            "long_break" | "longbreak" => Ok(SessionKind::LongBreak),
            _ => Err(ValidationError::InvalidValue {
                field: "kind".into(),
                message: format!("unknown session kind '{s}'"),
            }),
        }
    }
}

/// Clamp a user-entered session length into the allowed range.
pub fn clamp_session_minutes(minutes: u32) -> u32 {
    minutes.clamp(SESSION_MIN_MINUTES, SESSION_MAX_MINUTES)
}

/// Clamp a user-entered rest length into the allowed range.
pub fn clamp_rest_secs(secs: u32) -> u32 {
    secs.clamp(REST_MIN_SECS, REST_MAX_SECS)
}

/// Configured length of each session kind, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDurations {
    pub focus_secs: u32,
    pub short_break_secs: u32,
    pub long_break_secs: u32,
}

impl SessionDurations {
    /// Build from raw seconds. Values only need to be positive; user input
    /// goes through [`SessionDurations::from_minutes`] which applies bounds.
    pub fn new(focus_secs: u32, short_break_secs: u32, long_break_secs: u32) -> Self {
        Self {
            focus_secs: focus_secs.max(1),
            short_break_secs: short_break_secs.max(1),
            long_break_secs: long_break_secs.max(1),
        }
    }

    pub fn from_minutes(focus: u32, short_break: u32, long_break: u32) -> Self {
        Self {
            focus_secs: clamp_session_minutes(focus) * 60,
            short_break_secs: clamp_session_minutes(short_break) * 60,
            long_break_secs: clamp_session_minutes(long_break) * 60,
        }
    }

    pub fn get(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Focus => self.focus_secs,
            SessionKind::ShortBreak => self.short_break_secs,
            SessionKind::LongBreak => self.long_break_secs,
        }
    }

    /// Store a user-entered duration for `kind`. Returns the clamped seconds.
    pub fn set_minutes(&mut self, kind: SessionKind, minutes: u32) -> u32 {
        let secs = clamp_session_minutes(minutes) * 60;
        match kind {
            SessionKind::Focus => self.focus_secs = secs,
            SessionKind::ShortBreak => self.short_break_secs = secs,
            SessionKind::LongBreak => self.long_break_secs = secs,
        }
        secs
    }
}

impl Default for SessionDurations {
    fn default() -> Self {
        Self::from_minutes(25, 5, 15)
    }
}
