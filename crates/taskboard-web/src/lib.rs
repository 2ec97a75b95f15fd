//! Taskboard Web Server
//!
//! Axum-based REST API plus the WebSocket endpoint that carries board events.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod websocket;

use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use taskboard_db::BoardStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::ServerConfig;
use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/{id}",
            patch(routes::projects::update_project).delete(routes::projects::delete_project),
        )
        .route("/tasks", post(routes::tasks::create_task))
        .route("/tasks/{id}", patch(routes::tasks::update_task))
        .route("/test-socket", get(routes::diagnostics::test_socket))
        .route("/health", get(routes::diagnostics::health))
        .route("/ws", get(websocket::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server until the process is stopped.
pub async fn run_server(store: Arc<dyn BoardStore>, config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::new(store, &config);
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
