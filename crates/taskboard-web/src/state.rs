//! Application state.

use std::sync::Arc;

use taskboard_core::{BoardService, Broadcaster};
use taskboard_db::BoardStore;

use crate::config::ServerConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: BoardService,
    pub broadcaster: Arc<Broadcaster>,
}

impl AppState {
    pub fn new(store: Arc<dyn BoardStore>, config: &ServerConfig) -> Self {
        let broadcaster = Arc::new(Broadcaster::with_capacity(config.queue_capacity));
        let service = BoardService::new(store, broadcaster.clone())
            .with_store_timeout(config.store_timeout);
        Self {
            service,
            broadcaster,
        }
    }
}
