//! Monitoring event stream.
//!
//! The poller and stage tracker report what they do through an [`EventSink`]
//! instead of writing to a particular UI. Front ends subscribe to the events
//! they care about.
//!
//! # Architecture
//!
//! - `EventSink` trait: the interface components emit through
//! - `BroadcastSink`: fan-out to any number of async subscribers
//! - `RecordingSink`: keeps every event in memory, for tests and embedding
//! - `NoOpSink`: discards everything
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use voxwatch::events::{BroadcastSink, EventSink, MonitorEvent};
//!
//! let sink = Arc::new(BroadcastSink::new(64));
//! let mut rx = sink.subscribe();
//!
//! sink.emit(&MonitorEvent::ProcessingStarted);
//! assert!(matches!(rx.try_recv(), Ok(MonitorEvent::ProcessingStarted)));
//! ```

mod broadcast;
mod event;
mod noop;
mod recording;
mod sink;

pub use broadcast::BroadcastSink;
pub use event::MonitorEvent;
pub use noop::NoOpSink;
pub use recording::RecordingSink;
pub use sink::EventSink;
