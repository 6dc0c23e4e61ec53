//! In-memory event sink.

use super::{EventSink, MonitorEvent};
use parking_lot::Mutex;

/// Sink that records every event in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<MonitorEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    pub fn events(&self) -> Vec<MonitorEvent> {
        self.events.lock().clone()
    }

    /// Counts recorded events matching a predicate.
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&MonitorEvent) -> bool,
    {
        self.events.lock().iter().filter(|e| predicate(e)).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &MonitorEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let sink = RecordingSink::new();
        sink.emit(&MonitorEvent::ProcessingStarted);
        sink.emit(&MonitorEvent::ProcessingFinished { success: false });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], MonitorEvent::ProcessingStarted));
        assert!(matches!(
            events[1],
            MonitorEvent::ProcessingFinished { success: false }
        ));
    }

    #[test]
    fn test_count_and_clear() {
        let sink = RecordingSink::new();
        sink.emit(&MonitorEvent::StagesReset);
        sink.emit(&MonitorEvent::StagesReset);
        sink.emit(&MonitorEvent::ProcessingStarted);

        assert_eq!(sink.count(|e| matches!(e, MonitorEvent::StagesReset)), 2);

        sink.clear();
        assert!(sink.events().is_empty());
    }
}
