//! Project management.

pub mod model;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use taskboard_db::{BoardStore, ProjectChanges};
use uuid::Uuid;

use crate::error::{BoardError, BoardResult};
use crate::patch::{non_blank, nullable};
use crate::task::model::Task;
use crate::task::{self, NewTask};
use crate::timestamp;
use model::Project;

/// Body of `POST /projects`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<NewTask>,
}

/// Body of `PATCH /projects/{id}`.
///
/// `name` and `icon` are applied only when non-empty; `description` is
/// stored as given whenever the key is present, so `null` clears it and
/// `""` keeps an empty description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Load a project with its tasks.
pub async fn get_project(store: &dyn BoardStore, project_id: &str) -> BoardResult<Project> {
    let row = store
        .get_project(project_id)
        .await
        .map_err(BoardError::for_project(project_id))?;
    let tasks = task::list_tasks(store, project_id).await?;
    Ok(Project::from_row(row, tasks))
}

/// List every project with its tasks, in creation order.
pub async fn list_projects(store: &dyn BoardStore) -> BoardResult<Vec<Project>> {
    let rows = store.list_projects().await?;
    let mut projects = Vec::with_capacity(rows.len());
    for row in rows {
        let tasks = task::list_tasks(store, &row.id).await?;
        projects.push(Project::from_row(row, tasks));
    }
    Ok(projects)
}

/// Create a project and its initial tasks in one store call.
pub async fn create_project(store: &dyn BoardStore, input: NewProject) -> BoardResult<Project> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(BoardError::validation("Project name must not be empty"));
    }

    let now = Utc::now();
    let project_id = Uuid::new_v4().to_string();

    let mut tasks = Vec::with_capacity(input.tasks.len());
    for (offset, new_task) in input.tasks.into_iter().enumerate() {
        // Offset keeps nested tasks in request order in the store's index.
        let created = now + Duration::microseconds(offset as i64);
        tasks.push(task::build_task(&project_id, new_task, created)?);
    }

    let project = Project {
        id: project_id,
        name: name.to_string(),
        description: non_blank(input.description),
        icon: non_blank(input.icon),
        created_at: timestamp(now),
        updated_at: timestamp(now),
        tasks,
    };

    let task_rows: Vec<_> = project.tasks.iter().map(Task::to_row).collect();
    store.create_project(&project.to_row(), &task_rows).await?;

    tracing::info!(project_id = %project.id, tasks = project.tasks.len(), "Project created");
    Ok(project)
}

/// Apply a partial update and return the refreshed project.
pub async fn update_project(
    store: &dyn BoardStore,
    project_id: &str,
    patch: ProjectPatch,
) -> BoardResult<Project> {
    let changes = ProjectChanges {
        name: non_blank(patch.name).map(|name| name.trim().to_string()),
        description: patch.description,
        icon: non_blank(patch.icon),
        updated_at: timestamp(Utc::now()),
    };

    let row = store
        .update_project(project_id, &changes)
        .await
        .map_err(BoardError::for_project(project_id))?;

    let tasks = task::list_tasks(store, project_id).await?;
    Ok(Project::from_row(row, tasks))
}

/// Delete a project; its tasks go with it.
pub async fn delete_project(store: &dyn BoardStore, project_id: &str) -> BoardResult<()> {
    store
        .delete_project(project_id)
        .await
        .map_err(BoardError::for_project(project_id))?;
    tracing::info!(project_id = %project_id, "Project deleted");
    Ok(())
}
