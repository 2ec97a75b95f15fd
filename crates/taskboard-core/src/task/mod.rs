//! Task management.

pub mod model;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use taskboard_db::{BoardStore, TaskChanges};
use uuid::Uuid;

use crate::error::{BoardError, BoardResult};
use crate::patch::{non_blank, nullable};
use crate::project;
use crate::timestamp;
use model::{Task, TaskPriority, TaskStatus, TaskWithProject};

/// A task to create, either nested in `POST /projects` or standalone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub project_id: String,
    #[serde(flatten)]
    pub task: NewTask,
}

/// Body of `PATCH /tasks/{id}`. Every present key is applied as given;
/// `null` clears `description` and `dueDate`, and so does an empty `dueDate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "nullable")]
    pub due_date: Option<Option<String>>,
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_due_date(raw: &str) -> BoardResult<String> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp(ts.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(timestamp(midnight.and_utc()));
        }
    }
    Err(BoardError::validation(format!("Invalid due date: {}", raw)))
}

fn required_title(title: &str) -> BoardResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(BoardError::validation("Task title must not be empty"));
    }
    Ok(title.to_string())
}

/// Build a task for `project_id`, applying create-time defaults.
pub(crate) fn build_task(
    project_id: &str,
    input: NewTask,
    created: DateTime<Utc>,
) -> BoardResult<Task> {
    let due_date = non_blank(input.due_date)
        .map(|raw| parse_due_date(&raw))
        .transpose()?;

    Ok(Task {
        id: Uuid::new_v4().to_string(),
        title: required_title(&input.title)?,
        description: non_blank(input.description),
        status: input.status.unwrap_or_default(),
        priority: input.priority.unwrap_or_default(),
        due_date,
        project_id: project_id.to_string(),
        created_at: timestamp(created),
        updated_at: timestamp(created),
    })
}

/// Tasks of a project in creation order.
pub async fn list_tasks(store: &dyn BoardStore, project_id: &str) -> BoardResult<Vec<Task>> {
    let rows = store.list_tasks(project_id).await?;
    Ok(rows.into_iter().map(Task::from_row).collect())
}

/// Load a task with its owning project.
pub async fn get_task(store: &dyn BoardStore, task_id: &str) -> BoardResult<TaskWithProject> {
    let row = store
        .get_task(task_id)
        .await
        .map_err(BoardError::for_task(task_id))?;
    with_project(store, Task::from_row(row)).await
}

async fn with_project(store: &dyn BoardStore, task: Task) -> BoardResult<TaskWithProject> {
    let project = project::get_project(store, &task.project_id).await?;
    Ok(TaskWithProject { task, project })
}

/// Create a task under an existing project.
pub async fn create_task(store: &dyn BoardStore, input: CreateTask) -> BoardResult<TaskWithProject> {
    let task = build_task(&input.project_id, input.task, Utc::now())?;
    store
        .create_task(&task.to_row())
        .await
        .map_err(BoardError::for_project(&input.project_id))?;

    tracing::info!(task_id = %task.id, project_id = %task.project_id, "Task created");
    with_project(store, task).await
}

/// Apply a partial update and return the task with its refreshed project.
///
/// Fields are validated up front and merged into the stored row by the
/// store, so concurrent patches to different fields all land.
pub async fn update_task(
    store: &dyn BoardStore,
    task_id: &str,
    patch: TaskPatch,
) -> BoardResult<TaskWithProject> {
    let due_date = patch
        .due_date
        .map(|due| non_blank(due).map(|raw| parse_due_date(&raw)).transpose())
        .transpose()?;
    let changes = TaskChanges {
        title: patch.title.as_deref().map(required_title).transpose()?,
        description: patch.description,
        status: patch.status.map(|s| s.as_str().to_string()),
        priority: patch.priority.map(|p| p.as_str().to_string()),
        due_date,
        updated_at: timestamp(Utc::now()),
    };

    let row = store
        .update_task(task_id, &changes)
        .await
        .map_err(BoardError::for_task(task_id))?;
    let task = Task::from_row(row);

    tracing::debug!(task_id = %task.id, status = %task.status, "Task updated");
    with_project(store, task).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::NewProject;
    use taskboard_db::MemoryStore;

    async fn seeded() -> (MemoryStore, String) {
        let store = MemoryStore::new();
        let project = project::create_project(
            &store,
            NewProject {
                name: "Ops".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        (store, project.id)
    }

    #[test]
    fn due_date_accepts_plain_dates_and_rfc3339() {
        assert_eq!(
            parse_due_date("2025-06-01").unwrap(),
            "2025-06-01T00:00:00.000000Z"
        );
        assert_eq!(
            parse_due_date("2025-06-01T12:30:00+02:00").unwrap(),
            "2025-06-01T10:30:00.000000Z"
        );
        assert!(parse_due_date("next tuesday").is_err());
    }

    #[tokio::test]
    async fn create_task_applies_defaults_and_embeds_project() {
        let (store, project_id) = seeded().await;
        let created = create_task(
            &store,
            CreateTask {
                project_id: project_id.clone(),
                task: NewTask {
                    title: "Rotate keys".into(),
                    description: Some(String::new()),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();

        assert_eq!(created.task.status, TaskStatus::Todo);
        assert_eq!(created.task.priority, TaskPriority::Medium);
        assert_eq!(created.task.description, None);
        assert_eq!(created.project.id, project_id);
        assert_eq!(created.project.tasks.len(), 1);
        assert_eq!(created.project.tasks[0].id, created.task.id);
    }

    #[tokio::test]
    async fn create_task_for_missing_project_fails() {
        let (store, _) = seeded().await;
        let err = create_task(
            &store,
            CreateTask {
                project_id: "missing".into(),
                task: NewTask {
                    title: "Orphan".into(),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BoardError::ProjectNotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn update_task_changes_only_present_fields() {
        let (store, project_id) = seeded().await;
        let created = create_task(
            &store,
            CreateTask {
                project_id,
                task: NewTask {
                    title: "Audit".into(),
                    description: Some("yearly".into()),
                    due_date: Some("2025-12-31".into()),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();

        let patch: TaskPatch = serde_json::from_str(r#"{"status":"DONE","dueDate":null}"#).unwrap();
        let updated = update_task(&store, &created.task.id, patch).await.unwrap();

        assert_eq!(updated.task.status, TaskStatus::Done);
        assert_eq!(updated.task.due_date, None);
        assert_eq!(updated.task.description.as_deref(), Some("yearly"));
        assert_eq!(updated.task.title, "Audit");
        assert_eq!(updated.project.tasks[0].status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn invalid_patch_leaves_task_untouched() {
        let (store, project_id) = seeded().await;
        let created = create_task(
            &store,
            CreateTask {
                project_id,
                task: NewTask {
                    title: "Audit".into(),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();

        let patch: TaskPatch =
            serde_json::from_str(r#"{"status":"DONE","dueDate":"someday"}"#).unwrap();
        let err = update_task(&store, &created.task.id, patch).await.unwrap_err();
        assert!(matches!(err, BoardError::ValidationError(_)));

        let stored = get_task(&store, &created.task.id).await.unwrap();
        assert_eq!(stored.task.status, TaskStatus::Todo);
    }

    #[tokio::test]
    async fn update_unknown_task_is_not_found() {
        let (store, _) = seeded().await;
        let err = update_task(&store, "nope", TaskPatch::default()).await.unwrap_err();
        assert!(matches!(err, BoardError::TaskNotFound(_)));
    }
}
