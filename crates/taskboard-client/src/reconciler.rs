//! Turns transport events into cache invalidations and a status indicator.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::cache::{ProjectCache, ProjectFetcher};
use crate::transport::TransportEvent;

/// Connection indicator shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Reconciler<F> {
    cache: Arc<ProjectCache<F>>,
    status: watch::Sender<ConnectionState>,
}

impl<F: ProjectFetcher> Reconciler<F> {
    pub fn new(cache: Arc<ProjectCache<F>>) -> Self {
        let (status, _) = watch::channel(ConnectionState::Disconnected);
        Self { cache, status }
    }

    pub fn status(&self) -> watch::Receiver<ConnectionState> {
        self.status.subscribe()
    }

    pub fn handle(&self, event: TransportEvent) {
        match event {
            TransportEvent::Connected => {
                info!("Event stream connected");
                self.status.send_replace(ConnectionState::Connected);
            }
            TransportEvent::Disconnected { reason } => {
                info!(reason = %reason, "Event stream disconnected");
                self.status.send_replace(ConnectionState::Disconnected);
            }
            TransportEvent::Event(event) if event.invalidates_projects() => {
                debug!(
                    event = event.name(),
                    project_id = event.project_id().unwrap_or_default(),
                    "Invalidating project list"
                );
                self.cache.invalidate();
            }
            TransportEvent::Event(event) => {
                debug!(event = event.name(), "Event does not affect projects");
            }
        }
    }

    /// Consume transport events until the transport hangs up.
    pub async fn run(self, mut events: mpsc::Receiver<TransportEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        self.status.send_replace(ConnectionState::Disconnected);
        debug!("Reconciler stopped");
    }
}
