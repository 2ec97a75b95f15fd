//! Taskboard Core Library
//!
//! Domain models, the board service, and the real-time event broadcaster.

pub mod broadcast;
pub mod error;
pub mod events;
pub mod notifier;
pub mod patch;
pub mod project;
pub mod service;
pub mod task;

pub use broadcast::{Broadcaster, SubscriberId, Subscription};
pub use error::{BoardError, BoardResult};
pub use events::BoardEvent;
pub use notifier::Notifier;
pub use service::BoardService;

/// Wire/storage form of a timestamp: RFC 3339, UTC, microsecond precision.
pub(crate) fn timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
