//! Task management commands.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use taskboard_client::ApiClient;
use taskboard_core::task::model::{TaskPriority, TaskStatus};
use taskboard_core::task::{CreateTask, NewTask, TaskPatch};

use super::{parse_priority, parse_status};
use crate::output;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a task in a project
    Create(CreateTaskArgs),

    /// Move a task to a different status
    Status(StatusArgs),

    /// Change task fields
    Update(UpdateTaskArgs),
}

#[derive(Args)]
pub struct CreateTaskArgs {
    /// Project ID
    pub project_id: String,

    /// Task title
    pub title: String,

    #[arg(short, long)]
    pub description: Option<String>,

    /// Priority (low, medium, high, urgent)
    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<TaskPriority>,

    /// Initial status (todo, in_progress, done)
    #[arg(long, value_parser = parse_status)]
    pub status: Option<TaskStatus>,

    /// Due date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Task ID
    pub task_id: String,

    /// Target status (todo, in_progress, done)
    #[arg(value_parser = parse_status)]
    pub status: TaskStatus,
}

#[derive(Args)]
pub struct UpdateTaskArgs {
    /// Task ID
    pub task_id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(short, long, conflicts_with = "clear_description")]
    pub description: Option<String>,

    /// Remove the description
    #[arg(long)]
    pub clear_description: bool,

    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<TaskPriority>,

    /// Due date (YYYY-MM-DD or RFC 3339)
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,

    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
}

impl UpdateTaskArgs {
    fn into_patch(self) -> TaskPatch {
        TaskPatch {
            title: self.title,
            description: if self.clear_description {
                Some(None)
            } else {
                self.description.map(Some)
            },
            status: None,
            priority: self.priority,
            due_date: if self.clear_due {
                Some(None)
            } else {
                self.due.map(Some)
            },
        }
    }
}

pub async fn execute(cmd: TaskCommands, api: ApiClient) -> Result<()> {
    match cmd {
        TaskCommands::Create(args) => {
            let input = CreateTask {
                project_id: args.project_id,
                task: NewTask {
                    title: args.title,
                    description: args.description,
                    status: args.status,
                    priority: args.priority,
                    due_date: args.due,
                },
            };
            let created = api.create_task(&input).await?;
            println!(
                "{} Created task: {} ({}) in {}",
                "✓".green().bold(),
                created.task.title.cyan(),
                created.task.id.dimmed(),
                created.project.name
            );
        }

        TaskCommands::Status(args) => {
            let patch = TaskPatch {
                status: Some(args.status),
                ..Default::default()
            };
            let updated = api.update_task(&args.task_id, &patch).await?;
            println!(
                "{} Moved task {} to {}",
                "✓".green().bold(),
                updated.task.title.cyan(),
                output::status_colored(updated.task.status)
            );
        }

        TaskCommands::Update(args) => {
            let task_id = args.task_id.clone();
            let patch = args.into_patch();
            if patch == TaskPatch::default() {
                bail!("Nothing to update; pass at least one field");
            }
            let updated = api.update_task(&task_id, &patch).await?;
            println!("{} Updated task", "✓".green().bold());
            output::print_task_line(&updated.task);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_args() -> UpdateTaskArgs {
        UpdateTaskArgs {
            task_id: "t1".into(),
            title: None,
            description: None,
            clear_description: false,
            priority: None,
            due: None,
            clear_due: false,
        }
    }

    #[test]
    fn clear_flags_send_explicit_nulls() {
        let patch = UpdateTaskArgs {
            clear_due: true,
            ..update_args()
        }
        .into_patch();
        assert_eq!(patch.due_date, Some(None));
        assert_eq!(patch.description, None);
    }

    #[test]
    fn set_values_are_wrapped() {
        let patch = UpdateTaskArgs {
            description: Some("details".into()),
            due: Some("2025-09-30".into()),
            ..update_args()
        }
        .into_patch();
        assert_eq!(patch.description, Some(Some("details".into())));
        assert_eq!(patch.due_date, Some(Some("2025-09-30".into())));
    }
}
