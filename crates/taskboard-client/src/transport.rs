//! WebSocket transport: one connection to the server's event stream, reopened
//! with capped exponential backoff whenever it drops.

use std::time::Duration;

use futures::StreamExt;
use taskboard_core::BoardEvent;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// What the transport reports to its consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Connected,
    Disconnected { reason: String },
    Event(BoardEvent),
}

/// Delay schedule between connection attempts.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Consecutive failed attempts before giving up; `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl ReconnectPolicy {
    /// Delay before retry number `attempt` (1-based): doubles from
    /// `initial_delay`, never exceeding `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    fn exhausted(&self, attempt: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempt >= max)
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            max_attempts: None,
        }
    }
}

enum SessionEnd {
    Stopped,
    Dropped(String),
}

/// Resolves once `true` is published or the sender goes away.
async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

/// Connection loop feeding decoded board events into an mpsc channel.
pub struct Transport {
    url: String,
    policy: ReconnectPolicy,
    events: mpsc::Sender<TransportEvent>,
    shutdown: watch::Receiver<bool>,
}

impl Transport {
    pub fn new(
        url: impl Into<String>,
        policy: ReconnectPolicy,
        events: mpsc::Sender<TransportEvent>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            url: url.into(),
            policy,
            events,
            shutdown,
        }
    }

    /// Run until shutdown is requested, the consumer goes away, or the
    /// reconnect policy gives up.
    pub async fn run(mut self) {
        let mut failures = 0u32;
        loop {
            let connected = tokio::select! {
                result = connect_async(self.url.as_str()) => result,
                _ = stopped(&mut self.shutdown) => break,
            };

            match connected {
                Ok((socket, _)) => {
                    failures = 0;
                    info!(url = %self.url, "Connected to event stream");
                    if self.events.send(TransportEvent::Connected).await.is_err() {
                        break;
                    }
                    match self.session(socket).await {
                        SessionEnd::Stopped => break,
                        SessionEnd::Dropped(reason) => {
                            warn!(url = %self.url, reason = %reason, "Event stream dropped");
                            let event = TransportEvent::Disconnected { reason };
                            if self.events.send(event).await.is_err() {
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    failures += 1;
                    debug!(url = %self.url, attempt = failures, error = %e, "Connection attempt failed");
                    if self.policy.exhausted(failures) {
                        warn!(url = %self.url, attempts = failures, "Giving up on event stream");
                        break;
                    }
                }
            }

            let delay = self.policy.delay_for(failures.max(1));
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = stopped(&mut self.shutdown) => break,
            }
        }
        debug!(url = %self.url, "Transport stopped");
    }

    async fn session(&mut self, mut socket: Socket) -> SessionEnd {
        loop {
            let frame = tokio::select! {
                frame = socket.next() => frame,
                _ = stopped(&mut self.shutdown) => {
                    if let Err(e) = socket.close(None).await {
                        debug!(error = %e, "Close handshake failed");
                    }
                    return SessionEnd::Stopped;
                }
            };

            match frame {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<BoardEvent>(text.as_str()) {
                        Ok(event) => {
                            debug!(event = event.name(), "Event received");
                            if self.events.send(TransportEvent::Event(event)).await.is_err() {
                                let _ = socket.close(None).await;
                                return SessionEnd::Stopped;
                            }
                        }
                        Err(e) => debug!(error = %e, "Ignoring unrecognised frame"),
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame
                        .map(|f| f.reason.as_str().to_string())
                        .filter(|r| !r.is_empty())
                        .unwrap_or_else(|| "closed by server".to_string());
                    return SessionEnd::Dropped(reason);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return SessionEnd::Dropped(e.to_string()),
                None => return SessionEnd::Dropped("stream ended".to_string()),
            }
        }
    }
}
