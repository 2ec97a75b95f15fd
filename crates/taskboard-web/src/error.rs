//! Handler error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// A failed request. Always rendered as `500 {"error": <message>}`; the
/// underlying cause is logged, never returned.
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
}

impl ApiError {
    /// Build a `map_err` adapter that logs the cause under `message`.
    pub fn failed<E: std::fmt::Display>(message: &'static str) -> impl FnOnce(E) -> Self {
        move |cause| {
            tracing::error!(error = %cause, "{}", message);
            Self { message }
        }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.message })),
        )
            .into_response()
    }
}
