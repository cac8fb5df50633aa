use crate::timer::SessionKind;

pub const SESSION_DONE_TITLE: &str = "Time's up!";
pub const REST_DONE: &str = "Rest finished! Ready for the next set.";

/// Body of the notification shown when a session of `kind` completes.
pub fn session_done_body(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Focus => "Nice work! Time for a break.",
        SessionKind::ShortBreak | SessionKind::LongBreak => "Break's over. Back to focus?",
    }
}
