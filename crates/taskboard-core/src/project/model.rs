//! Project domain models.

use serde::{Deserialize, Serialize};
use taskboard_db::ProjectRow;

use crate::task::model::Task;

/// A project and the tasks it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    /// Create from a database row plus its loaded tasks.
    pub fn from_row(row: ProjectRow, tasks: Vec<Task>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            icon: row.icon,
            created_at: row.created_at,
            updated_at: row.updated_at,
            tasks,
        }
    }

    pub fn to_row(&self) -> ProjectRow {
        ProjectRow {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}
