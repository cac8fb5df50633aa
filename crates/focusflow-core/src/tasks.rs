//! Read-only view of the dashboard's task list.
//!
//! Tasks are owned by the backend. The session timer only ever reads the
//! open ones to offer a "focus on" selector and to show the selected title.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Tasks that can still be focused on.
pub fn open_tasks(tasks: &[TaskRef]) -> Vec<&TaskRef> {
    tasks.iter().filter(|t| !t.completed).collect()
}

/// Look up an open task by id.
pub fn find_open<'a>(tasks: &'a [TaskRef], id: &str) -> Option<&'a TaskRef> {
    tasks.iter().find(|t| !t.completed && t.id == id)
}

/// Load a task export (a JSON array) written by the dashboard backend.
///
/// Unknown fields are ignored so full task records can be passed through.
pub fn load_tasks(path: &Path) -> Result<Vec<TaskRef>> {
    let content = std::fs::read_to_string(path)?;
    let tasks: Vec<TaskRef> = serde_json::from_str(&content)?;
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<TaskRef> {
        vec![
            TaskRef { id: "a".into(), title: "Write report".into(), completed: false },
            TaskRef { id: "b".into(), title: "Pay bills".into(), completed: true },
            TaskRef { id: "c".into(), title: "Read chapter".into(), completed: false },
        ]
    }

    #[test]
    fn open_tasks_excludes_completed() {
        let tasks = sample();
        let open: Vec<_> = open_tasks(&tasks).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(open, vec!["a", "c"]);
    }

    #[test]
    fn find_open_ignores_completed() {
        let tasks = sample();
        assert_eq!(find_open(&tasks, "c").map(|t| t.title.as_str()), Some("Read chapter"));
        assert!(find_open(&tasks, "b").is_none());
        assert!(find_open(&tasks, "zzz").is_none());
    }

    #[test]
    fn load_tasks_tolerates_extra_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"[{"id":"1","title":"Gym","completed":false,"priority":"high","subTasks":[]},
                {"id":"2","title":"Done thing"}]"#,
        )
        .unwrap();
        let tasks = load_tasks(&path).unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(!tasks[1].completed);
    }
}
