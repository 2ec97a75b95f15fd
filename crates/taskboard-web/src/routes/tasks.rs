//! Task route handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use taskboard_core::task::{model::TaskWithProject, CreateTask, TaskPatch};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> Result<Json<TaskWithProject>, ApiError> {
    const FAILED: &str = "Failed to create task";
    let Json(input) = payload.map_err(ApiError::failed(FAILED))?;

    let task = state
        .service
        .create_task(input)
        .await
        .map_err(ApiError::failed(FAILED))?;
    Ok(Json(task))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<TaskWithProject>, ApiError> {
    const FAILED: &str = "Failed to update task";
    let Json(patch) = payload.map_err(ApiError::failed(FAILED))?;

    let task = state
        .service
        .update_task(&id, patch)
        .await
        .map_err(ApiError::failed(FAILED))?;
    Ok(Json(task))
}
