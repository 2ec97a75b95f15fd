//! Subscriber registry and best-effort fan-out of board events.
//!
//! Each subscriber owns a bounded queue. `broadcast` pushes into every queue
//! with a non-blocking send: a full queue drops the event for that
//! subscriber, a closed queue removes the subscriber. Nothing is retried and
//! nothing is kept for subscribers that register later.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, trace};

use crate::events::BoardEvent;
use crate::notifier::Notifier;

/// Default per-subscriber queue depth.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Identifies one registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Receiving end handed out by [`Broadcaster::register`].
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::Receiver<BoardEvent>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Next event; `None` once the subscriber has been unregistered and the
    /// queue is drained.
    pub async fn recv(&mut self) -> Option<BoardEvent> {
        self.rx.recv().await
    }

    /// Next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<BoardEvent> {
        self.rx.try_recv().ok()
    }
}

/// Process-wide publish point for board events.
pub struct Broadcaster {
    next_id: AtomicU64,
    capacity: usize,
    subscribers: Mutex<HashMap<SubscriberId, mpsc::Sender<BoardEvent>>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Broadcaster whose subscriber queues hold at most `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            capacity: capacity.max(1),
            subscribers: Mutex::new(HashMap::new()),
        }
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<SubscriberId, mpsc::Sender<BoardEvent>>> {
        // The map stays consistent even if a holder panicked.
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Attach a new subscriber. It receives every event broadcast from now on.
    pub fn register(&self) -> Subscription {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.capacity);
        let count = {
            let mut registry = self.registry();
            registry.insert(id, tx);
            registry.len()
        };
        debug!(subscriber_id = %id, subscriber_count = count, "Subscriber registered");
        Subscription { id, rx }
    }

    /// Detach a subscriber. Returns `false` if it was already gone.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let (removed, count) = {
            let mut registry = self.registry();
            let removed = registry.remove(&id).is_some();
            (removed, registry.len())
        };
        if removed {
            debug!(subscriber_id = %id, subscriber_count = count, "Subscriber unregistered");
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry().len()
    }

    /// Send `event` to every registered subscriber. Returns how many queues
    /// accepted it.
    pub fn broadcast(&self, event: BoardEvent) -> usize {
        let mut registry = self.registry();
        if registry.is_empty() {
            trace!(event = event.name(), "No subscribers, event dropped");
            return 0;
        }

        let mut delivered = 0;
        let mut closed = Vec::new();
        for (id, tx) in registry.iter() {
            match tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    debug!(subscriber_id = %id, event = event.name(), "Subscriber queue full, event dropped");
                }
                Err(TrySendError::Closed(_)) => closed.push(*id),
            }
        }
        for id in &closed {
            registry.remove(id);
        }

        debug!(
            event = event.name(),
            delivered,
            pruned = closed.len(),
            "Event broadcast"
        );
        delivered
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for Broadcaster {
    fn notify(&self, event: BoardEvent) {
        self.broadcast(event);
    }
}
