pub mod config;
pub mod rest;
pub mod session;
pub mod tasks;

use focusflow_core::Event;

/// One JSON object per line on stdout.
pub(crate) fn emit(events: &[Event]) -> Result<(), serde_json::Error> {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}
