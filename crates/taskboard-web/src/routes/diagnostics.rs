//! Liveness and socket diagnostics.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use taskboard_core::BoardEvent;
use tracing::info;

use crate::state::AppState;

pub async fn health() -> &'static str {
    "ok"
}

/// Push a `test-event` to every connected client.
pub async fn test_socket(State(state): State<AppState>) -> Json<Value> {
    let connected = state.broadcaster.subscriber_count();
    info!(connected_clients = connected, "Emitting test-event");

    state.broadcaster.broadcast(BoardEvent::TestEvent {
        message: "Socket is working!".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    });

    Json(json!({
        "success": true,
        "message": "Test event emitted",
        "connectedClients": connected,
    }))
}
