//! Query modules for projects and tasks stored in Redis.
//!
//! Key layout:
//! - `taskboard:projects` sorted set of project ids scored by creation time
//! - `taskboard:project:{id}` hash, `data` field holds the JSON row
//! - `taskboard:project:{id}:tasks` sorted set of task ids scored by creation time
//! - `taskboard:task:{id}` hash, `data` field holds the JSON row

pub mod projects;
mod scripts;
pub mod tasks;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Stored form of a project, without its tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Stored form of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Field-level changes to a stored project.
///
/// `None` leaves a field untouched; `Some(None)` clears an optional one.
/// The serialized form lists only the fields to overwrite, so it can be
/// merged into the stored JSON server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub updated_at: String,
}

impl ProjectChanges {
    pub fn apply(&self, row: &mut ProjectRow) {
        if let Some(name) = &self.name {
            row.name = name.clone();
        }
        if let Some(description) = &self.description {
            row.description = description.clone();
        }
        if let Some(icon) = &self.icon {
            row.icon = Some(icon.clone());
        }
        row.updated_at = self.updated_at.clone();
    }
}

/// Field-level changes to a stored task. The owning project never changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<String>>,
    pub updated_at: String,
}

impl TaskChanges {
    pub fn apply(&self, row: &mut TaskRow) {
        if let Some(title) = &self.title {
            row.title = title.clone();
        }
        if let Some(description) = &self.description {
            row.description = description.clone();
        }
        if let Some(status) = &self.status {
            row.status = status.clone();
        }
        if let Some(priority) = &self.priority {
            row.priority = priority.clone();
        }
        if let Some(due_date) = &self.due_date {
            row.due_date = due_date.clone();
        }
        row.updated_at = self.updated_at.clone();
    }
}

pub(crate) const PROJECTS_KEY: &str = "taskboard:projects";

pub(crate) fn project_key(id: &str) -> String {
    format!("taskboard:project:{}", id)
}

pub(crate) fn project_tasks_key(id: &str) -> String {
    format!("taskboard:project:{}:tasks", id)
}

pub(crate) const TASK_KEY_PREFIX: &str = "taskboard:task:";

pub(crate) fn task_key(id: &str) -> String {
    format!("{}{}", TASK_KEY_PREFIX, id)
}

/// Decode a row found while listing. Unreadable rows are logged and skipped.
pub(crate) fn decode_listed<T: DeserializeOwned>(kind: &'static str, id: &str, json: &str) -> Option<T> {
    match serde_json::from_str(json) {
        Ok(row) => Some(row),
        Err(e) => {
            tracing::warn!(kind, id = %id, error = %e, "Skipping unreadable row");
            None
        }
    }
}

/// Sorted-set score derived from an RFC 3339 creation timestamp.
pub(crate) fn creation_score(created_at: &str) -> i64 {
    chrono::DateTime::parse_from_rfc3339(created_at)
        .map(|ts| ts.timestamp_micros())
        .unwrap_or(0)
}
