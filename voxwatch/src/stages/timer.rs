//! Elapsed-time ticker.

use crate::events::{EventSink, MonitorEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Formats a duration as `MM:SS`. Minutes keep counting past 59.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Spawns a task emitting [`MonitorEvent::ElapsedTick`] immediately and then
/// every `period` until `shutdown` is cancelled.
///
/// Returns false if there is no runtime to spawn on.
pub(super) fn spawn_ticker(
    started_at: Instant,
    period: Duration,
    events: Arc<dyn EventSink>,
    shutdown: CancellationToken,
) -> bool {
    let Ok(handle) = Handle::try_current() else {
        debug!("No tokio runtime, elapsed ticker not started");
        return false;
    };

    handle.spawn(async move {
        let mut interval = time::interval_at(started_at, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,

                _ = interval.tick() => {
                    events.emit(&MonitorEvent::ElapsedTick {
                        elapsed: started_at.elapsed(),
                    });
                }
            }
        }
    });

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00");
        assert_eq!(format_elapsed(Duration::from_millis(59_999)), "00:59");
        assert_eq!(format_elapsed(Duration::from_secs(61)), "01:01");
        assert_eq!(format_elapsed(Duration::from_secs(3_725)), "62:05");
    }

    #[test]
    fn test_no_runtime_does_not_spawn() {
        let sink = Arc::new(RecordingSink::new());
        let spawned = spawn_ticker(
            Instant::now(),
            Duration::from_secs(1),
            sink,
            CancellationToken::new(),
        );
        assert!(!spawned);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_until_cancelled() {
        let sink = Arc::new(RecordingSink::new());
        let token = CancellationToken::new();

        assert!(spawn_ticker(
            Instant::now(),
            Duration::from_secs(1),
            sink.clone(),
            token.clone(),
        ));

        time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(sink.events().len(), 4);

        token.cancel();
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(sink.events().len(), 4);
    }
}
