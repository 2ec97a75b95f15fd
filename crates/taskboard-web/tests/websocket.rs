use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use taskboard_core::project::NewProject;
use taskboard_core::task::NewTask;
use taskboard_core::BoardEvent;
use taskboard_db::MemoryStore;
use taskboard_web::{create_router, state::AppState, ServerConfig};
use tokio_tungstenite::connect_async;

async fn spawn_server() -> (String, AppState) {
    let state = AppState::new(Arc::new(MemoryStore::new()), &ServerConfig::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("ws://{}/ws", addr), state)
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

#[tokio::test]
async fn connected_socket_receives_project_updated() {
    let (url, state) = spawn_server().await;
    let (mut socket, _) = connect_async(url.as_str()).await.unwrap();
    wait_for_subscribers(&state, 1).await;

    let project = state
        .service
        .create_project(NewProject {
            name: "Launch".into(),
            tasks: vec![NewTask {
                title: "Design".into(),
                ..Default::default()
            }],
            ..Default::default()
        })
        .await
        .unwrap();

    let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let event: BoardEvent = serde_json::from_str(frame.to_text().unwrap()).unwrap();
    match event {
        BoardEvent::ProjectUpdated(p) => {
            assert_eq!(p.id, project.id);
            assert_eq!(p.tasks.len(), 1);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn closing_the_socket_unregisters_the_subscriber() {
    let (url, state) = spawn_server().await;
    let (mut socket, _) = connect_async(url.as_str()).await.unwrap();
    wait_for_subscribers(&state, 1).await;

    socket.close(None).await.unwrap();
    drop(socket);
    wait_for_subscribers(&state, 0).await;

    // Nobody left to deliver to; must still succeed quietly.
    assert_eq!(
        state
            .broadcaster
            .broadcast(BoardEvent::ProjectDeleted { id: "p1".into() }),
        0
    );
}
