//! Centralized error types for board operations.

use thiserror::Error;

/// Main error type for board operations.
#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store call '{operation}' timed out after {elapsed_ms} ms")]
    Timeout {
        operation: &'static str,
        elapsed_ms: u64,
    },

    #[error("Database error: {0}")]
    Database(#[from] taskboard_db::DbError),
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

impl BoardError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Map a store error, turning `NotFound` into `ProjectNotFound`.
    pub(crate) fn for_project(project_id: &str) -> impl Fn(taskboard_db::DbError) -> Self + '_ {
        move |e| match e {
            taskboard_db::DbError::NotFound(_) => Self::ProjectNotFound(project_id.to_string()),
            other => Self::Database(other),
        }
    }

    /// Map a store error, turning `NotFound` into `TaskNotFound`.
    pub(crate) fn for_task(task_id: &str) -> impl Fn(taskboard_db::DbError) -> Self + '_ {
        move |e| match e {
            taskboard_db::DbError::NotFound(_) => Self::TaskNotFound(task_id.to_string()),
            other => Self::Database(other),
        }
    }
}
