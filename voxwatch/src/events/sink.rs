//! Event sink trait definition.

use super::MonitorEvent;

/// Receiver of monitoring events.
///
/// Implementations must be cheap and non-blocking: `emit` is called from the
/// polling and ticker tasks.
pub trait EventSink: Send + Sync {
    /// Delivers one event.
    fn emit(&self, event: &MonitorEvent);
}
