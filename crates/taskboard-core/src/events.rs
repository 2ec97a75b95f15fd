//! Real-time events pushed to connected clients.

use serde::{Deserialize, Serialize};

use crate::project::model::Project;
use crate::task::model::TaskWithProject;

/// Every event the server can push, with its payload fixed per kind.
///
/// Serialized as `{"event": "<name>", "data": <payload>}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum BoardEvent {
    /// A project was created or its fields changed.
    ProjectUpdated(Project),
    /// A project and its tasks were removed.
    ProjectDeleted { id: String },
    /// A task was created or changed.
    TaskUpdated(TaskWithProject),
    /// Diagnostics ping.
    TestEvent { message: String, timestamp: String },
}

impl BoardEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProjectUpdated(_) => "project-updated",
            Self::ProjectDeleted { .. } => "project-deleted",
            Self::TaskUpdated(_) => "task-updated",
            Self::TestEvent { .. } => "test-event",
        }
    }

    /// Whether a client's cached project list is stale after this event.
    pub fn invalidates_projects(&self) -> bool {
        !matches!(self, Self::TestEvent { .. })
    }

    /// Id of the project the event concerns, if any.
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Self::ProjectUpdated(project) => Some(&project.id),
            Self::ProjectDeleted { id } => Some(id),
            Self::TaskUpdated(task) => Some(&task.project.id),
            Self::TestEvent { .. } => None,
        }
    }
}
