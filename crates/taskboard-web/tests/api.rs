use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use taskboard_core::{BoardEvent, Subscription};
use taskboard_db::MemoryStore;
use taskboard_web::{create_router, state::AppState, ServerConfig};
use tower::ServiceExt;

fn test_app() -> (Router, AppState) {
    let state = AppState::new(Arc::new(MemoryStore::new()), &ServerConfig::default());
    (create_router(state.clone()), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn drain(sub: &mut Subscription) -> Vec<BoardEvent> {
    std::iter::from_fn(|| sub.try_recv()).collect()
}

async fn create_launch(app: &Router, task_count: usize) -> Value {
    let tasks: Vec<Value> = (0..task_count)
        .map(|i| json!({"title": format!("Task {}", i), "status": "TODO", "priority": "MEDIUM"}))
        .collect();
    let (status, project) = send(
        app,
        "POST",
        "/projects",
        Some(json!({"name": "Launch", "tasks": tasks})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    project
}

#[tokio::test]
async fn list_projects_starts_empty() {
    let (app, _) = test_app();
    let (status, body) = send(&app, "GET", "/projects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_project_returns_tasks_and_notifies_subscribers() {
    let (app, state) = test_app();
    let mut client = state.broadcaster.register();

    let (status, project) = send(
        &app,
        "POST",
        "/projects",
        Some(json!({
            "name": "Launch",
            "tasks": [{"title": "Design", "status": "TODO", "priority": "MEDIUM"}]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["name"], "Launch");
    assert_eq!(project["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(project["tasks"][0]["title"], "Design");
    assert_eq!(project["tasks"][0]["projectId"], project["id"]);

    let events = drain(&mut client);
    assert_eq!(events.len(), 1);
    match &events[0] {
        BoardEvent::ProjectUpdated(p) => {
            assert_eq!(p.id, project["id"].as_str().unwrap());
            assert_eq!(p.tasks.len(), 1);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn patch_task_status_reaches_only_connected_subscribers() {
    let (app, state) = test_app();
    let project = create_launch(&app, 1).await;
    let task_id = project["tasks"][0]["id"].as_str().unwrap().to_string();

    let mut connected = state.broadcaster.register();
    let mut offline = state.broadcaster.register();
    state.broadcaster.unregister(offline.id());

    let (status, task) = send(
        &app,
        "PATCH",
        &format!("/tasks/{}", task_id),
        Some(json!({"status": "DONE"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["status"], "DONE");
    assert_eq!(task["project"]["id"], project["id"]);

    let events = drain(&mut connected);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name(), "task-updated");
    assert!(drain(&mut offline).is_empty());

    // The offline client only sees the change by fetching again.
    let (_, projects) = send(&app, "GET", "/projects", None).await;
    assert_eq!(projects[0]["tasks"][0]["status"], "DONE");
}

#[tokio::test]
async fn delete_project_cascades_and_emits_one_id_event() {
    let (app, state) = test_app();
    let project = create_launch(&app, 3).await;
    let project_id = project["id"].as_str().unwrap().to_string();
    let mut client = state.broadcaster.register();

    let (status, body) = send(&app, "DELETE", &format!("/projects/{}", project_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Project deleted successfully"}));

    let (_, projects) = send(&app, "GET", "/projects", None).await;
    assert_eq!(projects, json!([]));

    assert_eq!(
        drain(&mut client),
        vec![BoardEvent::ProjectDeleted { id: project_id }]
    );
}

#[tokio::test]
async fn create_task_embeds_matching_project() {
    let (app, state) = test_app();
    let project = create_launch(&app, 0).await;
    let mut client = state.broadcaster.register();

    let (status, task) = send(
        &app,
        "POST",
        "/tasks",
        Some(json!({
            "title": "Ship",
            "status": "IN_PROGRESS",
            "priority": "URGENT",
            "dueDate": "2025-09-30",
            "projectId": project["id"],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["projectId"], project["id"]);
    assert_eq!(task["project"]["id"], project["id"]);
    assert_eq!(task["project"]["tasks"][0]["id"], task["id"]);
    assert_eq!(task["dueDate"], "2025-09-30T00:00:00.000000Z");

    let events = drain(&mut client);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].project_id(), project["id"].as_str());
}

#[tokio::test]
async fn patch_project_updates_fields_and_notifies() {
    let (app, state) = test_app();
    let project = create_launch(&app, 2).await;
    let mut client = state.broadcaster.register();

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/projects/{}", project["id"].as_str().unwrap()),
        Some(json!({"description": "Q3", "icon": "RocketOutlined"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Launch");
    assert_eq!(updated["description"], "Q3");
    assert_eq!(updated["icon"], "RocketOutlined");
    assert_eq!(updated["tasks"].as_array().unwrap().len(), 2);
    assert_eq!(drain(&mut client).len(), 1);
}

#[tokio::test]
async fn failures_are_generic_500s_without_events() {
    let (app, state) = test_app();
    let mut client = state.broadcaster.register();

    let (status, body) = send(&app, "POST", "/projects", Some(json!({"tasks": []}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to create project"}));

    let (status, body) = send(
        &app,
        "PATCH",
        "/projects/does-not-exist",
        Some(json!({"name": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to update project"}));

    let (status, body) = send(&app, "DELETE", "/projects/does-not-exist", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to delete project"}));

    let (status, body) = send(
        &app,
        "POST",
        "/tasks",
        Some(json!({"title": "Orphan", "projectId": "does-not-exist"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to create task"}));

    let (status, body) = send(
        &app,
        "PATCH",
        "/tasks/does-not-exist",
        Some(json!({"status": "BLOCKED"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to update task"}));

    assert!(drain(&mut client).is_empty());
}

#[tokio::test]
async fn test_socket_reports_clients_and_pings_them() {
    let (app, state) = test_app();
    let mut client = state.broadcaster.register();

    let (status, body) = send(&app, "GET", "/test-socket", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["connectedClients"], 1);

    let events = drain(&mut client);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name(), "test-event");
    assert!(!events[0].invalidates_projects());
}

#[tokio::test]
async fn health_is_plain_ok() {
    let (app, _) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}
