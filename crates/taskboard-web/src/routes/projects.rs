//! Project route handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{json, Value};
use taskboard_core::project::{model::Project, NewProject, ProjectPatch};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = state
        .service
        .list_projects()
        .await
        .map_err(ApiError::failed("Failed to fetch projects"))?;
    Ok(Json(projects))
}

pub async fn create_project(
    State(state): State<AppState>,
    payload: Result<Json<NewProject>, JsonRejection>,
) -> Result<Json<Project>, ApiError> {
    const FAILED: &str = "Failed to create project";
    let Json(input) = payload.map_err(ApiError::failed(FAILED))?;

    let project = state
        .service
        .create_project(input)
        .await
        .map_err(ApiError::failed(FAILED))?;
    Ok(Json(project))
}

pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProjectPatch>, JsonRejection>,
) -> Result<Json<Project>, ApiError> {
    const FAILED: &str = "Failed to update project";
    let Json(patch) = payload.map_err(ApiError::failed(FAILED))?;

    tracing::debug!(project_id = %id, "Updating project");
    let project = state
        .service
        .update_project(&id, patch)
        .await
        .map_err(ApiError::failed(FAILED))?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .service
        .delete_project(&id)
        .await
        .map_err(ApiError::failed("Failed to delete project"))?;
    Ok(Json(json!({ "message": "Project deleted successfully" })))
}
