//! Taskboard client
//!
//! Keeps a local copy of the project list in step with the server: one
//! WebSocket per process carries board events, and every data event marks
//! the cached list stale so the next read refetches it over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod live;
pub mod reconciler;
pub mod transport;

pub use api::ApiClient;
pub use cache::{ProjectCache, ProjectFetcher};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use live::LiveBoard;
pub use reconciler::{ConnectionState, Reconciler};
pub use transport::{ReconnectPolicy, TransportEvent};
