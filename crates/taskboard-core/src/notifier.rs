//! Outbound change notifications.

use crate::events::BoardEvent;

/// Sink for board events. Fire-and-forget: implementations must not block
/// and must never fail the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: BoardEvent);
}
