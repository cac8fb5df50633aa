use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Result of one timer command or tick: the state after the change plus the
/// events it produced. Side effects are left to whoever consumes `events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition<T> {
    pub snapshot: T,
    pub events: Vec<Event>,
}

impl<T> Transition<T> {
    pub fn new(snapshot: T, events: Vec<Event>) -> Self {
        Self { snapshot, events }
    }

    /// True when the command changed nothing observable.
    pub fn is_noop(&self) -> bool {
        self.events.is_empty()
    }

    pub fn completions(&self) -> usize {
        self.events.iter().filter(|e| e.is_completion()).count()
    }
}
