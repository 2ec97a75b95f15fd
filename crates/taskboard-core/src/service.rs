//! Board service: store mutations followed by change notifications.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use taskboard_db::BoardStore;

use crate::error::{BoardError, BoardResult};
use crate::events::BoardEvent;
use crate::notifier::Notifier;
use crate::project::{self, model::Project, NewProject, ProjectPatch};
use crate::task::{self, model::TaskWithProject, CreateTask, TaskPatch};

/// Default bound on a single store operation.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Entry point used by the HTTP handlers.
///
/// Every mutation runs against the store under a timeout and, only when it
/// succeeds, hands the resulting entity to the notifier.
#[derive(Clone)]
pub struct BoardService {
    store: Arc<dyn BoardStore>,
    notifier: Arc<dyn Notifier>,
    store_timeout: Duration,
}

impl BoardService {
    pub fn new(store: Arc<dyn BoardStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = BoardResult<T>>,
    ) -> BoardResult<T> {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(BoardError::Timeout {
                operation,
                elapsed_ms: self.store_timeout.as_millis() as u64,
            }),
        }
    }

    pub async fn list_projects(&self) -> BoardResult<Vec<Project>> {
        self.bounded("list projects", project::list_projects(&*self.store))
            .await
    }

    pub async fn create_project(&self, input: NewProject) -> BoardResult<Project> {
        let project = self
            .bounded("create project", project::create_project(&*self.store, input))
            .await?;
        self.notifier.notify(BoardEvent::ProjectUpdated(project.clone()));
        Ok(project)
    }

    pub async fn update_project(&self, project_id: &str, patch: ProjectPatch) -> BoardResult<Project> {
        let project = self
            .bounded(
                "update project",
                project::update_project(&*self.store, project_id, patch),
            )
            .await?;
        self.notifier.notify(BoardEvent::ProjectUpdated(project.clone()));
        Ok(project)
    }

    pub async fn delete_project(&self, project_id: &str) -> BoardResult<()> {
        self.bounded(
            "delete project",
            project::delete_project(&*self.store, project_id),
        )
        .await?;
        self.notifier.notify(BoardEvent::ProjectDeleted {
            id: project_id.to_string(),
        });
        Ok(())
    }

    pub async fn create_task(&self, input: CreateTask) -> BoardResult<TaskWithProject> {
        let task = self
            .bounded("create task", task::create_task(&*self.store, input))
            .await?;
        self.notifier.notify(BoardEvent::TaskUpdated(task.clone()));
        Ok(task)
    }

    pub async fn update_task(&self, task_id: &str, patch: TaskPatch) -> BoardResult<TaskWithProject> {
        let task = self
            .bounded("update task", task::update_task(&*self.store, task_id, patch))
            .await?;
        self.notifier.notify(BoardEvent::TaskUpdated(task.clone()));
        Ok(task)
    }
}
