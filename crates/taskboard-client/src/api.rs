//! HTTP client for the board REST API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use taskboard_core::project::{model::Project, NewProject, ProjectPatch};
use taskboard_core::task::{model::TaskWithProject, CreateTask, TaskPatch};
use tracing::debug;

use crate::cache::ProjectFetcher;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// Thin wrapper over the REST endpoints.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        debug!(base_url = %config.base_url, "ApiClient initialized");
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.to_string(),
            };
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn list_projects(&self) -> ClientResult<Vec<Project>> {
        let response = self
            .http
            .get(self.config.endpoint("/projects"))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn create_project(&self, input: &NewProject) -> ClientResult<Project> {
        let response = self
            .http
            .post(self.config.endpoint("/projects"))
            .json(input)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn update_project(&self, project_id: &str, patch: &ProjectPatch) -> ClientResult<Project> {
        let response = self
            .http
            .patch(self.config.endpoint(&format!("/projects/{}", project_id)))
            .json(patch)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Returns the server's confirmation message.
    pub async fn delete_project(&self, project_id: &str) -> ClientResult<String> {
        let response = self
            .http
            .delete(self.config.endpoint(&format!("/projects/{}", project_id)))
            .send()
            .await?;
        let body: MessageBody = Self::decode(response).await?;
        Ok(body.message)
    }

    pub async fn create_task(&self, input: &CreateTask) -> ClientResult<TaskWithProject> {
        let response = self
            .http
            .post(self.config.endpoint("/tasks"))
            .json(input)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn update_task(&self, task_id: &str, patch: &TaskPatch) -> ClientResult<TaskWithProject> {
        let response = self
            .http
            .patch(self.config.endpoint(&format!("/tasks/{}", task_id)))
            .json(patch)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Ask the server to ping every connected socket.
    pub async fn test_socket(&self) -> ClientResult<Value> {
        let response = self
            .http
            .get(self.config.endpoint("/test-socket"))
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl ProjectFetcher for ApiClient {
    async fn fetch_projects(&self) -> ClientResult<Vec<Project>> {
        self.list_projects().await
    }
}
