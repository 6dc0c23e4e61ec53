//! Fan-out sink backed by a tokio broadcast channel.

use super::{EventSink, MonitorEvent};
use tokio::sync::broadcast;

/// Default channel capacity. Ticker events arrive once per second, so this
/// covers several minutes of a stalled subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Sink that forwards every event to all current subscribers.
///
/// Emitting with no subscribers is not an error; the event is dropped.
/// Slow subscribers observe `RecvError::Lagged` rather than blocking emitters.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    sender: broadcast::Sender<MonitorEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns a receiver for events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventSink for BroadcastSink {
    fn emit(&self, event: &MonitorEvent) {
        let _ = self.sender.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers() {
        let sink = BroadcastSink::default();
        sink.emit(&MonitorEvent::ProcessingStarted);
        assert_eq!(sink.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_all_subscribers_receive() {
        let sink = BroadcastSink::new(8);
        let mut a = sink.subscribe();
        let mut b = sink.subscribe();

        sink.emit(&MonitorEvent::ProcessingFinished { success: true });

        assert!(matches!(
            a.recv().await,
            Ok(MonitorEvent::ProcessingFinished { success: true })
        ));
        assert!(matches!(
            b.recv().await,
            Ok(MonitorEvent::ProcessingFinished { success: true })
        ));
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags() {
        let sink = BroadcastSink::new(2);
        let mut rx = sink.subscribe();

        for _ in 0..5 {
            sink.emit(&MonitorEvent::StagesReset);
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
    }
}
