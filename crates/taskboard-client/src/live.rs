//! Live board: transport, reconciler and cache wired together for one
//! client process.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::{ProjectCache, ProjectFetcher};
use crate::config::ClientConfig;
use crate::reconciler::{ConnectionState, Reconciler};
use crate::transport::Transport;

const TRANSPORT_QUEUE: usize = 64;

/// A connected client view of the board.
///
/// Must be created inside a tokio runtime. Dropping it stops the background
/// tasks and tears the cache down; `shutdown` does the same but waits for
/// the socket to close.
pub struct LiveBoard<F: ProjectFetcher> {
    cache: Arc<ProjectCache<F>>,
    status: watch::Receiver<ConnectionState>,
    shutdown: watch::Sender<bool>,
    transport: Option<JoinHandle<()>>,
    reconciler: Option<JoinHandle<()>>,
}

impl<F: ProjectFetcher> LiveBoard<F> {
    /// Open the event stream and start reconciling against `fetcher`.
    pub fn connect(config: &ClientConfig, fetcher: F) -> Self {
        let cache = Arc::new(ProjectCache::new(fetcher));
        let reconciler = Reconciler::new(Arc::clone(&cache));
        let status = reconciler.status();

        let (events_tx, events_rx) = mpsc::channel(TRANSPORT_QUEUE);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let transport = Transport::new(
            config.ws_url(),
            config.reconnect.clone(),
            events_tx,
            shutdown_rx,
        );

        debug!(url = %config.ws_url(), "Starting live board");
        Self {
            cache,
            status,
            shutdown,
            transport: Some(tokio::spawn(transport.run())),
            reconciler: Some(tokio::spawn(reconciler.run(events_rx))),
        }
    }

    pub fn cache(&self) -> &Arc<ProjectCache<F>> {
        &self.cache
    }

    pub fn status(&self) -> watch::Receiver<ConnectionState> {
        self.status.clone()
    }

    pub fn is_connected(&self) -> bool {
        *self.status.borrow() == ConnectionState::Connected
    }

    /// Close the socket, stop the background tasks and tear the cache down.
    pub async fn shutdown(mut self) {
        self.shutdown.send_replace(true);
        if let Some(transport) = self.transport.take() {
            let _ = transport.await;
        }
        // The transport owned the event sender, so the reconciler drains and exits.
        if let Some(reconciler) = self.reconciler.take() {
            let _ = reconciler.await;
        }
        self.cache.close();
        debug!("Live board shut down");
    }
}

impl<F: ProjectFetcher> Drop for LiveBoard<F> {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
        self.cache.close();
    }
}
