//! Side effects of timer transitions.
//!
//! Timers only compute state and emit [`Event`]s. The [`EffectDispatcher`]
//! turns those events into toasts, system notifications, alert tones and the
//! immersive-mode signal. None of these outputs is allowed to fail the
//! timer: notification and audio errors are logged and dropped.

pub mod messages;
mod tone;

pub use tone::{SoundPreset, Tone};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: ToastLevel::Success,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: ToastLevel::Info,
        }
    }
}

/// Whether system-level notifications may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    Granted,
    Denied,
    /// The host has no notification facility.
    Unavailable,
}

#[derive(Error, Debug)]
pub enum EffectError {
    #[error("notification failed: {0}")]
    Notification(String),

    #[error("audio unavailable: {0}")]
    Audio(String),
}

/// In-app toast presenter. Always available.
pub trait Toaster {
    fn show(&mut self, toast: Toast);
}

/// System notification channel.
pub trait Notifier {
    fn permission(&self) -> NotificationPermission;
    fn notify(&mut self, title: &str, body: &str) -> Result<(), EffectError>;
}

pub trait AlertSound {
    fn play(&mut self, tone: &Tone) -> Result<(), EffectError>;
}

/// Consumer of the immersive-mode flag (the surrounding shell).
pub trait ImmersiveSink {
    fn set_immersive(&mut self, active: bool);
}

/// What one `dispatch` call actually did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectReport {
    pub toasts: usize,
    pub notifications: usize,
    pub tones: usize,
    /// Notification or audio failures that were swallowed.
    pub suppressed: usize,
}

pub struct EffectDispatcher {
    toaster: Box<dyn Toaster>,
    notifier: Option<Box<dyn Notifier>>,
    sound: Option<Box<dyn AlertSound>>,
    immersive: Option<Box<dyn ImmersiveSink>>,
    tone: Tone,
    notifications_enabled: bool,
}

impl EffectDispatcher {
    pub fn new(toaster: Box<dyn Toaster>) -> Self {
        Self {
            toaster,
            notifier: None,
            sound: None,
            immersive: None,
            tone: Tone::default(),
            notifications_enabled: true,
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_sound(mut self, sound: Box<dyn AlertSound>) -> Self {
        self.sound = Some(sound);
        self
    }

    pub fn with_immersive_sink(mut self, sink: Box<dyn ImmersiveSink>) -> Self {
        self.immersive = Some(sink);
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Turning notifications off routes session completions to toasts.
    /// The rest tone is an in-app alert and keeps playing.
    pub fn notifications_enabled(mut self, enabled: bool) -> Self {
        self.notifications_enabled = enabled;
        self
    }

    pub fn dispatch(&mut self, events: &[Event]) -> EffectReport {
        let mut report = EffectReport::default();
        for event in events {
            match event {
                Event::SessionCompleted { kind, .. } => {
                    let body = messages::session_done_body(*kind);
                    if !self.try_notify(messages::SESSION_DONE_TITLE, body, &mut report) {
                        self.toaster.show(Toast::info(body));
                        report.toasts += 1;
                    }
                }
                Event::RestCompleted { .. } => {
                    self.try_play(&mut report);
                    self.toaster.show(Toast::success(messages::REST_DONE));
                    report.toasts += 1;
                }
                Event::ImmersiveChanged { active, .. } => {
                    if let Some(sink) = self.immersive.as_mut() {
                        sink.set_immersive(*active);
                    }
                }
                _ => {}
            }
        }
        report
    }

    /// Returns true when a system notification was delivered.
    fn try_notify(&mut self, title: &str, body: &str, report: &mut EffectReport) -> bool {
        if !self.notifications_enabled {
            return false;
        }
        let Some(notifier) = self.notifier.as_mut() else {
            return false;
        };
        match notifier.permission() {
            NotificationPermission::Granted => {}
            permission => {
                debug!(?permission, "system notification skipped");
                return false;
            }
        }
        match notifier.notify(title, body) {
            Ok(()) => {
                report.notifications += 1;
                true
            }
            Err(e) => {
                warn!(error = %e, "system notification failed, falling back to toast");
                report.suppressed += 1;
                false
            }
        }
    }

    fn try_play(&mut self, report: &mut EffectReport) {
        let Some(sound) = self.sound.as_mut() else {
            return;
        };
        match sound.play(&self.tone) {
            Ok(()) => report.tones += 1,
            Err(e) => {
                warn!(error = %e, "could not play alert tone");
                report.suppressed += 1;
            }
        }
    }
}
