//! Store abstraction over project/task persistence.

use async_trait::async_trait;
use taskboard_redis::{projects, tasks, RedisPool};

use crate::{DbResult, ProjectChanges, ProjectRow, TaskChanges, TaskRow};

/// Persistence operations the board service relies on.
///
/// Missing rows are reported as `DbError::NotFound`. Updates apply their
/// changes to the current row in a single step and return the result.
/// Deleting a project removes its tasks in the same operation.
#[async_trait]
pub trait BoardStore: Send + Sync {
    async fn create_project(&self, row: &ProjectRow, initial_tasks: &[TaskRow]) -> DbResult<()>;
    async fn get_project(&self, project_id: &str) -> DbResult<ProjectRow>;
    async fn list_projects(&self) -> DbResult<Vec<ProjectRow>>;
    async fn update_project(
        &self,
        project_id: &str,
        changes: &ProjectChanges,
    ) -> DbResult<ProjectRow>;
    async fn delete_project(&self, project_id: &str) -> DbResult<()>;

    async fn create_task(&self, row: &TaskRow) -> DbResult<()>;
    async fn get_task(&self, task_id: &str) -> DbResult<TaskRow>;
    async fn update_task(&self, task_id: &str, changes: &TaskChanges) -> DbResult<TaskRow>;
    async fn list_tasks(&self, project_id: &str) -> DbResult<Vec<TaskRow>>;
}

/// Redis-backed store.
#[derive(Clone)]
pub struct RedisStore {
    pool: RedisPool,
}

impl RedisStore {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoardStore for RedisStore {
    async fn create_project(&self, row: &ProjectRow, initial_tasks: &[TaskRow]) -> DbResult<()> {
        projects::create_project(&self.pool, row, initial_tasks).await
    }

    async fn get_project(&self, project_id: &str) -> DbResult<ProjectRow> {
        projects::get_project(&self.pool, project_id).await
    }

    async fn list_projects(&self) -> DbResult<Vec<ProjectRow>> {
        projects::list_projects(&self.pool).await
    }

    async fn update_project(
        &self,
        project_id: &str,
        changes: &ProjectChanges,
    ) -> DbResult<ProjectRow> {
        projects::update_project(&self.pool, project_id, changes).await
    }

    async fn delete_project(&self, project_id: &str) -> DbResult<()> {
        projects::delete_project(&self.pool, project_id).await
    }

    async fn create_task(&self, row: &TaskRow) -> DbResult<()> {
        tasks::create_task(&self.pool, row).await
    }

    async fn get_task(&self, task_id: &str) -> DbResult<TaskRow> {
        tasks::get_task(&self.pool, task_id).await
    }

    async fn update_task(&self, task_id: &str, changes: &TaskChanges) -> DbResult<TaskRow> {
        tasks::update_task(&self.pool, task_id, changes).await
    }

    async fn list_tasks(&self, project_id: &str) -> DbResult<Vec<TaskRow>> {
        tasks::list_tasks(&self.pool, project_id).await
    }
}
