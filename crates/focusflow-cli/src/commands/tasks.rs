use std::path::PathBuf;

use clap::Subcommand;
use focusflow_core::tasks::{load_tasks, open_tasks};

#[derive(Subcommand)]
pub enum TasksAction {
    /// List open tasks available to focus on
    List {
        /// Task export from the dashboard (JSON array)
        #[arg(long)]
        tasks: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: TasksAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TasksAction::List { tasks, json } => {
            let all = load_tasks(&tasks)?;
            let open = open_tasks(&all);
            if json {
                println!("{}", serde_json::to_string_pretty(&open)?);
            } else if open.is_empty() {
                println!("No open tasks.");
            } else {
                for task in open {
                    println!("{}\t{}", task.id, task.title);
                }
            }
        }
    }
    Ok(())
}
