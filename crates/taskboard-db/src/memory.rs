//! In-memory store, insertion ordered.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::BoardStore;
use crate::{DbError, DbResult, ProjectChanges, ProjectRow, TaskChanges, TaskRow};

#[derive(Default)]
struct Tables {
    projects: Vec<ProjectRow>,
    tasks: Vec<TaskRow>,
}

/// Process-local store with the same semantics as the Redis one.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn project_not_found(id: &str) -> DbError {
    DbError::NotFound(format!("Project not found: {}", id))
}

fn task_not_found(id: &str) -> DbError {
    DbError::NotFound(format!("Task not found: {}", id))
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn create_project(&self, row: &ProjectRow, initial_tasks: &[TaskRow]) -> DbResult<()> {
        let mut tables = self.tables.write().await;
        if tables.projects.iter().any(|p| p.id == row.id) {
            return Err(DbError::Conflict(format!(
                "Project already exists: {}",
                row.id
            )));
        }
        tables.projects.push(row.clone());
        tables.tasks.extend(initial_tasks.iter().cloned());
        Ok(())
    }

    async fn get_project(&self, project_id: &str) -> DbResult<ProjectRow> {
        let tables = self.tables.read().await;
        tables
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .cloned()
            .ok_or_else(|| project_not_found(project_id))
    }

    async fn list_projects(&self) -> DbResult<Vec<ProjectRow>> {
        Ok(self.tables.read().await.projects.clone())
    }

    async fn update_project(
        &self,
        project_id: &str,
        changes: &ProjectChanges,
    ) -> DbResult<ProjectRow> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| project_not_found(project_id))?;
        changes.apply(slot);
        Ok(slot.clone())
    }

    async fn delete_project(&self, project_id: &str) -> DbResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != project_id);
        if tables.projects.len() == before {
            return Err(project_not_found(project_id));
        }
        tables.tasks.retain(|t| t.project_id != project_id);
        Ok(())
    }

    async fn create_task(&self, row: &TaskRow) -> DbResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.projects.iter().any(|p| p.id == row.project_id) {
            return Err(project_not_found(&row.project_id));
        }
        tables.tasks.push(row.clone());
        Ok(())
    }

    async fn get_task(&self, task_id: &str) -> DbResult<TaskRow> {
        let tables = self.tables.read().await;
        tables
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
            .ok_or_else(|| task_not_found(task_id))
    }

    async fn update_task(&self, task_id: &str, changes: &TaskChanges) -> DbResult<TaskRow> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| task_not_found(task_id))?;
        changes.apply(slot);
        Ok(slot.clone())
    }

    async fn list_tasks(&self, project_id: &str) -> DbResult<Vec<TaskRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str) -> ProjectRow {
        ProjectRow {
            id: id.to_string(),
            name: format!("Project {}", id),
            description: None,
            icon: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    fn task(id: &str, project_id: &str) -> TaskRow {
        TaskRow {
            id: id.to_string(),
            project_id: project_id.to_string(),
            title: format!("Task {}", id),
            description: None,
            status: "TODO".to_string(),
            priority: "MEDIUM".to_string(),
            due_date: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn delete_project_cascades_to_tasks() {
        let store = MemoryStore::new();
        store
            .create_project(&project("p1"), &[task("t1", "p1"), task("t2", "p1")])
            .await
            .unwrap();
        store.create_project(&project("p2"), &[task("t3", "p2")]).await.unwrap();

        store.delete_project("p1").await.unwrap();

        assert!(store.list_tasks("p1").await.unwrap().is_empty());
        assert!(matches!(store.get_task("t1").await, Err(DbError::NotFound(_))));
        assert_eq!(store.list_tasks("p2").await.unwrap().len(), 1);
        assert_eq!(store.list_projects().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_missing_project_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.delete_project("nope").await,
            Err(DbError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn task_requires_existing_project() {
        let store = MemoryStore::new();
        let err = store.create_task(&task("t1", "ghost")).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_project_is_a_conflict() {
        let store = MemoryStore::new();
        store.create_project(&project("p1"), &[]).await.unwrap();
        assert!(matches!(
            store.create_project(&project("p1"), &[]).await,
            Err(DbError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn updates_merge_into_the_current_row() {
        let store = MemoryStore::new();
        store.create_project(&project("p1"), &[task("t1", "p1")]).await.unwrap();

        let renamed = ProjectChanges {
            name: Some("Relaunch".to_string()),
            updated_at: "2025-01-02T00:00:00Z".to_string(),
            ..Default::default()
        };
        let with_icon = ProjectChanges {
            icon: Some("Rocket".to_string()),
            updated_at: "2025-01-03T00:00:00Z".to_string(),
            ..Default::default()
        };
        store.update_project("p1", &renamed).await.unwrap();
        let row = store.update_project("p1", &with_icon).await.unwrap();
        assert_eq!(row.name, "Relaunch");
        assert_eq!(row.icon.as_deref(), Some("Rocket"));
        assert_eq!(store.get_project("p1").await.unwrap(), row);

        let done = TaskChanges {
            status: Some("DONE".to_string()),
            updated_at: "2025-01-02T00:00:00Z".to_string(),
            ..Default::default()
        };
        let row = store.update_task("t1", &done).await.unwrap();
        assert_eq!(row.status, "DONE");
        assert_eq!(row.title, "Task t1");
        assert_eq!(row.project_id, "p1");
    }

    #[tokio::test]
    async fn update_missing_rows_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.update_project("nope", &ProjectChanges::default()).await,
            Err(DbError::NotFound(_))
        ));
        assert!(matches!(
            store.update_task("nope", &TaskChanges::default()).await,
            Err(DbError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn projects_keep_insertion_order() {
        let store = MemoryStore::new();
        for id in ["a", "b", "c"] {
            store.create_project(&project(id), &[]).await.unwrap();
        }
        let ids: Vec<String> = store
            .list_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
