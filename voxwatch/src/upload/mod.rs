//! Hands finished uploads over to status monitoring.
//!
//! The upload itself happens elsewhere. [`UploadIntegrator`] receives its
//! lifecycle callbacks, drives the first two stages and, once the file is in
//! storage, starts monitoring after a short delay so the pipeline has picked
//! the file up.

use crate::config::UploadConfig;
use crate::http::AsyncHttpClient;
use crate::stages::{StageId, StageTracker};
use crate::status::{StartOutcome, StatusPoller};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Result reported by the upload collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadOutcome {
    pub success: bool,
    /// Storage key of the uploaded file, with or without the `uploads/` prefix.
    pub file_key: Option<String>,
}

impl UploadOutcome {
    pub fn succeeded(file_key: impl Into<String>) -> Self {
        Self {
            success: true,
            file_key: Some(file_key.into()),
        }
    }

    pub fn failed() -> Self {
        Self::default()
    }
}

/// Connects upload callbacks to the stage tracker and the status poller.
pub struct UploadIntegrator<C> {
    poller: StatusPoller<C>,
    tracker: Arc<StageTracker>,
    config: UploadConfig,
    /// Cancels monitoring starts that are still waiting out the delay.
    /// Replaced on every cancel so later uploads schedule normally.
    pending: Mutex<CancellationToken>,
}

impl<C: AsyncHttpClient + 'static> UploadIntegrator<C> {
    pub fn new(poller: StatusPoller<C>, tracker: Arc<StageTracker>, config: UploadConfig) -> Self {
        Self {
            poller,
            tracker,
            config,
            pending: Mutex::new(CancellationToken::new()),
        }
    }

    /// An upload began: a new run starts on the upload stage.
    pub fn upload_started(&self) {
        self.tracker.start_processing();
        self.tracker.next_stage(Some(StageId::Upload), None);
    }

    /// An upload ended.
    ///
    /// On success with a key the upload stage completes, the trigger stage
    /// becomes active and monitoring starts after `monitor_delay`. The returned
    /// handle resolves once monitoring has started (or the wait was cancelled).
    /// Anything else only logs a warning.
    pub fn upload_finished(&self, outcome: &UploadOutcome) -> Option<JoinHandle<Option<StartOutcome>>> {
        let file_key = match (outcome.success, outcome.file_key.as_deref()) {
            (true, Some(key)) if !key.trim().is_empty() => key.to_string(),
            _ => {
                warn!(
                    success = outcome.success,
                    file_key = ?outcome.file_key,
                    "Upload unsuccessful or without file key, monitoring not started"
                );
                return None;
            }
        };

        self.tracker.complete_stage(Some(StageId::Upload));
        self.tracker.next_stage(Some(StageId::Trigger), None);

        let Ok(handle) = Handle::try_current() else {
            error!(file_key = %file_key, "No async runtime, monitoring not started");
            return None;
        };

        let delay = self.config.monitor_delay();
        info!(
            file_key = %file_key,
            delay_ms = delay.as_millis() as u64,
            "Upload finished, monitoring scheduled"
        );

        let poller = self.poller.clone();
        let cancelled = self.pending.lock().child_token();
        Some(handle.spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => {
                    info!(file_key = %file_key, "Scheduled monitoring start cancelled");
                    None
                }
                _ = tokio::time::sleep(delay) => Some(poller.start_monitoring(&file_key).await),
            }
        }))
    }

    /// The upload failed before reaching storage.
    pub fn upload_failed(&self, message: &str) {
        error!(error = message, "Upload failed");
        self.tracker.error_stage(Some(StageId::Upload), Some(message));
        self.tracker.finish_processing(false);
    }

    /// Drops any monitoring start still waiting on its delay.
    pub fn cancel_pending(&self) {
        let previous = std::mem::replace(&mut *self.pending.lock(), CancellationToken::new());
        previous.cancel();
    }
}

impl<C> Drop for UploadIntegrator<C> {
    fn drop(&mut self) {
        self.pending.get_mut().cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PollingConfig, StageConfig};
    use crate::events::NoOpSink;
    use crate::http::tests::ScriptedHttpClient;
    use crate::stages::{CountingUploadControl, StageStatus};
    use crate::status::FileKey;
    use std::time::Duration;

    fn integrator() -> (
        UploadIntegrator<ScriptedHttpClient>,
        Arc<ScriptedHttpClient>,
        Arc<StageTracker>,
    ) {
        let client = Arc::new(ScriptedHttpClient::new());
        let tracker = Arc::new(StageTracker::new(
            StageConfig::default(),
            Arc::new(CountingUploadControl::default()),
            Arc::new(NoOpSink),
        ));
        let poller = StatusPoller::builder(client.clone(), PollingConfig::default())
            .with_stages(tracker.clone())
            .build();
        let integrator = UploadIntegrator::new(poller, tracker.clone(), UploadConfig::default());
        (integrator, client, tracker)
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_started_activates_upload_stage() {
        let (integrator, _, tracker) = integrator();

        integrator.upload_started();

        assert!(tracker.is_visible());
        assert_eq!(tracker.current_stage(), Some(StageId::Upload));
        assert_eq!(tracker.stage(StageId::Upload).status, StageStatus::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_finished_starts_monitoring_after_delay() {
        let (integrator, client, tracker) = integrator();
        client.push_json(r#"{"status":"PENDING","polling_recommended":true}"#);
        integrator.upload_started();

        let handle = integrator
            .upload_finished(&UploadOutcome::succeeded("talk.wav"))
            .unwrap();

        assert_eq!(tracker.stage(StageId::Upload).status, StageStatus::Completed);
        assert_eq!(tracker.current_stage(), Some(StageId::Trigger));

        tokio::time::sleep(Duration::from_millis(1_900)).await;
        assert!(client.requests().is_empty());

        let key = FileKey::normalize("talk.wav").unwrap();
        assert_eq!(handle.await.unwrap(), Some(StartOutcome::Started(key.clone())));
        assert_eq!(client.requests().len(), 1);
        assert!(integrator.poller.is_monitoring(&key));

        integrator.poller.stop_all_monitoring();
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_without_key_does_not_monitor() {
        let (integrator, client, tracker) = integrator();
        integrator.upload_started();

        let outcome = UploadOutcome {
            success: true,
            file_key: None,
        };
        assert!(integrator.upload_finished(&outcome).is_none());
        assert!(integrator.upload_finished(&UploadOutcome::failed()).is_none());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(client.requests().is_empty());
        assert_eq!(tracker.stage(StageId::Upload).status, StageStatus::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending_drops_scheduled_start() {
        let (integrator, client, _) = integrator();

        let handle = integrator
            .upload_finished(&UploadOutcome::succeeded("talk.wav"))
            .unwrap();
        integrator.cancel_pending();

        assert_eq!(handle.await.unwrap(), None);
        assert!(client.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_after_cancel_pending_still_monitors() {
        let (integrator, client, _) = integrator();
        client.push_json(r#"{"status":"PENDING","polling_recommended":true}"#);

        let first = integrator
            .upload_finished(&UploadOutcome::succeeded("a.wav"))
            .unwrap();
        integrator.cancel_pending();
        assert_eq!(first.await.unwrap(), None);

        let second = integrator
            .upload_finished(&UploadOutcome::succeeded("b.wav"))
            .unwrap();

        let key = FileKey::normalize("b.wav").unwrap();
        assert_eq!(second.await.unwrap(), Some(StartOutcome::Started(key.clone())));
        assert!(integrator.poller.is_monitoring(&key));
        assert_eq!(client.requests().len(), 1);

        integrator.poller.stop_all_monitoring();
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_failed_marks_upload_stage() {
        let (integrator, _, tracker) = integrator();
        integrator.upload_started();

        integrator.upload_failed("network unreachable");

        let upload = tracker.stage(StageId::Upload);
        assert_eq!(upload.status, StageStatus::Error);
        assert_eq!(upload.detail.as_deref(), Some("network unreachable"));
    }
}
