//! No-operation event sink.

use super::{EventSink, MonitorEvent};

/// A sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl EventSink for NoOpSink {
    #[inline]
    fn emit(&self, _event: &MonitorEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_sink_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NoOpSink>();
    }

    #[test]
    fn test_noop_sink_as_trait_object() {
        let sink: Box<dyn EventSink> = Box::new(NoOpSink);
        sink.emit(&MonitorEvent::StagesReset);
    }
}
