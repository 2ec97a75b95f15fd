use std::sync::Arc;
use std::time::Duration;

use taskboard_client::{ApiClient, ClientConfig, ClientError, ConnectionState, LiveBoard};
use taskboard_core::project::{NewProject, ProjectPatch};
use taskboard_core::task::{model::TaskStatus, CreateTask, NewTask, TaskPatch};
use taskboard_db::MemoryStore;
use taskboard_web::{create_router, state::AppState, ServerConfig};
use tokio::sync::watch;

async fn spawn_server() -> (ClientConfig, AppState) {
    let state = AppState::new(Arc::new(MemoryStore::new()), &ServerConfig::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (ClientConfig::new(format!("http://{}", addr)), state)
}

async fn wait_for_subscribers(state: &AppState, expected: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while state.broadcaster.subscriber_count() != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("subscriber count never settled");
}

async fn wait_for_status(status: &mut watch::Receiver<ConnectionState>, expected: ConnectionState) {
    tokio::time::timeout(Duration::from_secs(5), status.wait_for(|s| *s == expected))
        .await
        .expect("status never changed")
        .unwrap();
}

async fn next_invalidation(rx: &mut watch::Receiver<u64>) -> u64 {
    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("no invalidation arrived")
        .unwrap();
    *rx.borrow_and_update()
}

#[tokio::test]
async fn server_mutations_refresh_the_cached_project_list() {
    let (config, state) = spawn_server().await;
    let api = ApiClient::new(config.clone()).unwrap();
    let board = LiveBoard::connect(&config, api.clone());

    let mut status = board.status();
    wait_for_status(&mut status, ConnectionState::Connected).await;
    wait_for_subscribers(&state, 1).await;
    assert!(board.cache().get().await.unwrap().is_empty());

    let mut invalidations = board.cache().invalidations();
    let project = api
        .create_project(&NewProject {
            name: "Launch".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    next_invalidation(&mut invalidations).await;

    let projects = board.cache().get().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, project.id);

    let task = api
        .create_task(&CreateTask {
            project_id: project.id.clone(),
            task: NewTask {
                title: "Design".into(),
                ..Default::default()
            },
        })
        .await
        .unwrap();
    next_invalidation(&mut invalidations).await;

    api.update_task(
        &task.task.id,
        &TaskPatch {
            status: Some(TaskStatus::Done),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    next_invalidation(&mut invalidations).await;

    let projects = board.cache().get().await.unwrap();
    assert_eq!(projects[0].tasks.len(), 1);
    assert_eq!(projects[0].tasks[0].status, TaskStatus::Done);

    board.shutdown().await;
    wait_for_subscribers(&state, 0).await;
}

#[tokio::test]
async fn rename_and_delete_round_trip_through_the_cache() {
    let (config, state) = spawn_server().await;
    let api = ApiClient::new(config.clone()).unwrap();
    let board = LiveBoard::connect(&config, api.clone());
    wait_for_status(&mut board.status(), ConnectionState::Connected).await;
    wait_for_subscribers(&state, 1).await;

    let mut invalidations = board.cache().invalidations();
    let project = api
        .create_project(&NewProject {
            name: "Draft".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    next_invalidation(&mut invalidations).await;

    api.update_project(
        &project.id,
        &ProjectPatch {
            name: Some("Final".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    next_invalidation(&mut invalidations).await;
    assert_eq!(board.cache().get().await.unwrap()[0].name, "Final");

    let message = api.delete_project(&project.id).await.unwrap();
    assert_eq!(message, "Project deleted successfully");
    next_invalidation(&mut invalidations).await;
    assert!(board.cache().get().await.unwrap().is_empty());

    board.shutdown().await;
}

#[tokio::test]
async fn test_socket_reaches_the_client_without_invalidating() {
    let (config, state) = spawn_server().await;
    let api = ApiClient::new(config.clone()).unwrap();
    let board = LiveBoard::connect(&config, api.clone());
    wait_for_status(&mut board.status(), ConnectionState::Connected).await;
    wait_for_subscribers(&state, 1).await;

    board.cache().get().await.unwrap();
    let reply = api.test_socket().await.unwrap();
    assert_eq!(reply["success"], true);
    assert_eq!(reply["connectedClients"], 1);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!board.cache().is_stale());
    assert_eq!(board.cache().fetches_started(), 1);

    board.shutdown().await;
}

#[tokio::test]
async fn server_errors_surface_as_status_errors() {
    let (config, _state) = spawn_server().await;
    let api = ApiClient::new(config).unwrap();

    let err = api
        .update_task("missing", &TaskPatch::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ClientError::Status {
            status: 500,
            message: "Failed to update task".into(),
        }
    );
}

#[tokio::test]
async fn shutdown_disconnects_and_closes_the_cache() {
    let (config, state) = spawn_server().await;
    let api = ApiClient::new(config.clone()).unwrap();
    let board = LiveBoard::connect(&config, api);
    wait_for_subscribers(&state, 1).await;

    let cache = Arc::clone(board.cache());
    let status = board.status();
    board.shutdown().await;

    wait_for_subscribers(&state, 0).await;
    assert_eq!(*status.borrow(), ConnectionState::Disconnected);
    assert_eq!(cache.get().await.unwrap_err(), ClientError::Closed);
}
