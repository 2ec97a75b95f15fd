//! Cached project list with invalidation and coalesced refetch.
//!
//! Reads share a single in-flight request. `invalidate` marks the cached
//! list stale and aborts a refetch that was started before it, so waiters
//! move on to a fresh request instead of stacking another one behind it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use futures::future::{abortable, AbortHandle, Aborted, BoxFuture, FutureExt, Shared};
use taskboard_core::project::model::Project;
use tokio::sync::watch;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Source of the full project list.
#[async_trait]
pub trait ProjectFetcher: Send + Sync + 'static {
    async fn fetch_projects(&self) -> ClientResult<Vec<Project>>;
}

type Projects = Arc<Vec<Project>>;
type SharedFetch = Shared<BoxFuture<'static, ClientResult<Projects>>>;

struct InFlight {
    generation: u64,
    fetch: SharedFetch,
    abort: AbortHandle,
}

struct CacheState {
    value: Option<Projects>,
    stale: bool,
    generation: u64,
    in_flight: Option<InFlight>,
    closed: bool,
}

pub struct ProjectCache<F> {
    fetcher: Arc<F>,
    state: Mutex<CacheState>,
    invalidations: watch::Sender<u64>,
    fetches_started: AtomicU64,
}

impl<F: ProjectFetcher> ProjectCache<F> {
    /// Empty cache; the first read fetches.
    pub fn new(fetcher: F) -> Self {
        let (invalidations, _) = watch::channel(0);
        Self {
            fetcher: Arc::new(fetcher),
            state: Mutex::new(CacheState {
                value: None,
                stale: true,
                generation: 0,
                in_flight: None,
                closed: false,
            }),
            invalidations,
            fetches_started: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn start_fetch(&self, generation: u64) -> InFlight {
        let fetcher = Arc::clone(&self.fetcher);
        let (request, abort) = abortable(async move { fetcher.fetch_projects().await });
        let fetch = async move {
            match request.await {
                Ok(Ok(projects)) => Ok(Arc::new(projects)),
                Ok(Err(e)) => Err(e),
                Err(Aborted) => Err(ClientError::Aborted),
            }
        }
        .boxed()
        .shared();

        self.fetches_started.fetch_add(1, Ordering::Relaxed);
        debug!(generation, "Refetching project list");
        InFlight {
            generation,
            fetch,
            abort,
        }
    }

    /// Current project list, refetching first if it is stale.
    pub async fn get(&self) -> ClientResult<Projects> {
        loop {
            let (generation, fetch) = {
                let mut state = self.lock();
                if state.closed {
                    return Err(ClientError::Closed);
                }
                if !state.stale {
                    if let Some(value) = &state.value {
                        return Ok(Arc::clone(value));
                    }
                }
                if state.in_flight.is_none() {
                    let in_flight = self.start_fetch(state.generation);
                    state.in_flight = Some(in_flight);
                }
                match &state.in_flight {
                    Some(in_flight) => (in_flight.generation, in_flight.fetch.clone()),
                    None => continue,
                }
            };

            // Await a clone: a completed `Shared` no longer compares equal.
            let result = fetch.clone().await;

            let mut state = self.lock();
            if state
                .in_flight
                .as_ref()
                .is_some_and(|f| f.fetch.ptr_eq(&fetch))
            {
                state.in_flight = None;
            }
            if state.closed {
                return Err(ClientError::Closed);
            }

            match result {
                Ok(projects) if state.generation == generation => {
                    state.value = Some(Arc::clone(&projects));
                    state.stale = false;
                    return Ok(projects);
                }
                // Invalidated while the response was on its way back.
                Ok(_) | Err(ClientError::Aborted) => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Mark the cached list stale. A refetch already underway is abandoned.
    pub fn invalidate(&self) {
        let generation = {
            let mut state = self.lock();
            state.stale = true;
            state.generation += 1;
            if let Some(superseded) = state.in_flight.take() {
                superseded.abort.abort();
                debug!(
                    superseded = superseded.generation,
                    "In-flight refetch superseded"
                );
            }
            state.generation
        };
        self.invalidations.send_replace(generation);
    }

    /// Last fetched list, even if stale.
    pub fn peek(&self) -> Option<Projects> {
        self.lock().value.clone()
    }

    pub fn is_stale(&self) -> bool {
        self.lock().stale
    }

    /// Fires on every invalidation with the new generation number.
    pub fn invalidations(&self) -> watch::Receiver<u64> {
        self.invalidations.subscribe()
    }

    /// Number of HTTP refetches started so far.
    pub fn fetches_started(&self) -> u64 {
        self.fetches_started.load(Ordering::Relaxed)
    }

    /// Tear the cache down. A refetch already underway runs to completion but
    /// its result is discarded; later reads fail with `Closed`.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.value = None;
    }
}
