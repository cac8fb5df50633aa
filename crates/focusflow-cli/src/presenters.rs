//! Terminal renderings of the timer side effects.
//!
//! stdout carries JSON events; everything meant for a human goes to stderr.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chrono::Local;
use focusflow_core::effects::{
    AlertSound, EffectError, ImmersiveSink, NotificationPermission, Notifier, Toast, ToastLevel,
    Toaster,
};
use focusflow_core::Tone;
use notify_rust::Notification;
use tracing::debug;

const WAV_SAMPLE_RATE: u32 = 22_050;

/// `mm:ss`, minutes unbounded.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Redraw the countdown on the current stderr line.
pub fn draw_countdown(label: &str, remaining_secs: u32) {
    let mut err = std::io::stderr();
    let _ = write!(err, "\r{label} {}   ", format_clock(remaining_secs));
    let _ = err.flush();
}

pub struct TermToaster;

impl Toaster for TermToaster {
    fn show(&mut self, toast: Toast) {
        let marker = match toast.level {
            ToastLevel::Success => "ok",
            ToastLevel::Info => "--",
        };
        eprintln!("\n[{}] {marker} {}", Local::now().format("%H:%M:%S"), toast.message);
    }
}

/// Desktop notifications through the platform notification service.
pub struct DesktopNotifier {
    permission: NotificationPermission,
}

impl DesktopNotifier {
    /// Checks once whether a notification daemon answers.
    pub fn detect() -> Self {
        Self {
            permission: detect_permission(),
        }
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn detect_permission() -> NotificationPermission {
    match notify_rust::get_server_information() {
        Ok(info) => {
            debug!(server = %info.name, "notification daemon found");
            NotificationPermission::Granted
        }
        Err(e) => {
            debug!(error = %e, "no notification daemon");
            NotificationPermission::Unavailable
        }
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn detect_permission() -> NotificationPermission {
    debug!("assuming platform notification center is available");
    NotificationPermission::Granted
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<(), EffectError> {
        Notification::new()
            .summary(title)
            .body(body)
            .appname("focusflow")
            .icon("alarm-clock")
            .show()
            .map(|_| ())
            .map_err(|e| EffectError::Notification(e.to_string()))
    }
}

/// Rings the terminal bell and optionally saves the generated tone as WAV.
pub struct TerminalBell {
    pub tone_out: Option<PathBuf>,
}

impl AlertSound for TerminalBell {
    fn play(&mut self, tone: &Tone) -> Result<(), EffectError> {
        let mut err = std::io::stderr();
        err.write_all(b"\x07")
            .and_then(|_| err.flush())
            .map_err(|e| EffectError::Audio(e.to_string()))?;

        if let Some(path) = &self.tone_out {
            let file = File::create(path).map_err(|e| EffectError::Audio(e.to_string()))?;
            tone.write_wav(BufWriter::new(file), WAV_SAMPLE_RATE)
                .map_err(|e| EffectError::Audio(e.to_string()))?;
        }
        Ok(())
    }
}

/// Stands in for the dashboard shell hiding its navigation.
pub struct ChromeBanner;

impl ImmersiveSink for ChromeBanner {
    fn set_immersive(&mut self, active: bool) {
        if active {
            eprintln!("\nImmersive mode: non-essential notifications silenced. Focus.");
        } else {
            eprintln!("\nImmersive mode off.");
        }
    }
}
