//! Explicit wiring of the monitoring components.
//!
//! [`MonitorContext`] owns one stage tracker, one status poller and one upload
//! integrator, all sharing the same event sink. Nothing is global: embedders
//! create a context, hand its parts to whatever drives them, and call
//! [`MonitorContext::shutdown`] when done.

use crate::config::{ConfigFile, PollingConfig, StageConfig, UploadConfig};
use crate::events::{EventSink, NoOpSink};
use crate::http::AsyncHttpClient;
use crate::results::{NoOpPresenter, ResultPresenter};
use crate::stages::{NoOpUploadControl, StageTracker, UploadControl};
use crate::status::StatusPoller;
use crate::upload::UploadIntegrator;
use std::sync::Arc;
use tracing::info;

/// The poller, tracker and upload integrator for one client.
pub struct MonitorContext<C> {
    poller: StatusPoller<C>,
    tracker: Arc<StageTracker>,
    integrator: UploadIntegrator<C>,
    events: Arc<dyn EventSink>,
}

impl<C: AsyncHttpClient + 'static> MonitorContext<C> {
    pub fn builder(client: C, config: &ConfigFile) -> MonitorContextBuilder<C> {
        MonitorContextBuilder {
            client: Arc::new(client),
            polling: config.polling_config(),
            stages: config.stage_config(),
            upload: config.upload_config(),
            upload_control: Arc::new(NoOpUploadControl),
            presenter: Arc::new(NoOpPresenter),
            events: Arc::new(NoOpSink),
        }
    }

    pub fn new(
        client: C,
        config: &ConfigFile,
        upload_control: Arc<dyn UploadControl>,
        presenter: Arc<dyn ResultPresenter>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self::builder(client, config)
            .with_upload_control(upload_control)
            .with_presenter(presenter)
            .with_events(events)
            .build()
    }

    pub fn poller(&self) -> &StatusPoller<C> {
        &self.poller
    }

    pub fn tracker(&self) -> &Arc<StageTracker> {
        &self.tracker
    }

    pub fn integrator(&self) -> &UploadIntegrator<C> {
        &self.integrator
    }

    pub fn events(&self) -> &Arc<dyn EventSink> {
        &self.events
    }

    /// Cancels delayed monitoring starts, stops every session and resets the
    /// stages. Returns the number of sessions stopped.
    pub fn shutdown(&self) -> usize {
        self.integrator.cancel_pending();
        let stopped = self.poller.stop_all_monitoring();
        self.tracker.reset();
        info!(stopped, "Monitor context shut down");
        stopped
    }
}

/// Builder for [`MonitorContext`].
///
/// Component configs start from the [`ConfigFile`] and can be replaced, which
/// is how command-line overrides are applied.
pub struct MonitorContextBuilder<C> {
    client: Arc<C>,
    polling: PollingConfig,
    stages: StageConfig,
    upload: UploadConfig,
    upload_control: Arc<dyn UploadControl>,
    presenter: Arc<dyn ResultPresenter>,
    events: Arc<dyn EventSink>,
}

impl<C: AsyncHttpClient + 'static> MonitorContextBuilder<C> {
    pub fn with_polling_config(mut self, polling: PollingConfig) -> Self {
        self.polling = polling;
        self
    }

    pub fn with_stage_config(mut self, stages: StageConfig) -> Self {
        self.stages = stages;
        self
    }

    pub fn with_upload_config(mut self, upload: UploadConfig) -> Self {
        self.upload = upload;
        self
    }

    pub fn with_upload_control(mut self, upload_control: Arc<dyn UploadControl>) -> Self {
        self.upload_control = upload_control;
        self
    }

    pub fn with_presenter(mut self, presenter: Arc<dyn ResultPresenter>) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn build(self) -> MonitorContext<C> {
        let tracker = Arc::new(StageTracker::new(
            self.stages,
            self.upload_control,
            Arc::clone(&self.events),
        ));

        let poller = StatusPoller::builder(self.client, self.polling)
            .with_stages(tracker.clone())
            .with_presenter(self.presenter)
            .with_events(Arc::clone(&self.events))
            .build();

        let integrator = UploadIntegrator::new(poller.clone(), Arc::clone(&tracker), self.upload);

        MonitorContext {
            poller,
            tracker,
            integrator,
            events: self.events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MonitorEvent, RecordingSink};
    use crate::http::tests::ScriptedHttpClient;
    use crate::stages::{CountingUploadControl, StageId, StageStatus};
    use crate::status::StopReason;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_components_share_sink_and_tracker() {
        let client = ScriptedHttpClient::new();
        client.push_json(r#"{"status":"TRANSCRIBING","polling_recommended":true}"#);
        let sink = Arc::new(RecordingSink::new());
        let context = MonitorContext::builder(client, &ConfigFile::default())
            .with_events(sink.clone())
            .build();

        context.tracker().start_processing();
        context.poller().start_monitoring("a.wav").await;

        assert_eq!(
            context.tracker().stage(StageId::Transcribing).status,
            StageStatus::Active
        );
        assert_eq!(
            sink.count(|e| matches!(e, MonitorEvent::MonitoringStarted { .. })),
            1
        );
        assert_eq!(sink.count(|e| matches!(e, MonitorEvent::ProcessingStarted)), 1);

        context.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_override() {
        let context = MonitorContext::builder(ScriptedHttpClient::new(), &ConfigFile::default())
            .with_polling_config(
                PollingConfig::new()
                    .with_api_url("http://localhost:8080/status/")
                    .with_interval(Duration::from_millis(500)),
            )
            .build();

        assert_eq!(context.poller().config().api_url(), "http://localhost:8080/status");
        assert_eq!(context.poller().config().interval(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_sessions_and_unlocks() {
        let client = ScriptedHttpClient::new();
        client.push_json(r#"{"status":"PENDING","polling_recommended":true}"#);
        let upload = Arc::new(CountingUploadControl::default());
        let sink = Arc::new(RecordingSink::new());
        let context = MonitorContext::new(
            client,
            &ConfigFile::default(),
            upload.clone(),
            Arc::new(NoOpPresenter),
            sink.clone(),
        );

        context.tracker().start_processing();
        context.poller().start_monitoring("a.wav").await;
        assert!(upload.is_locked());

        assert_eq!(context.shutdown(), 1);

        assert!(context.poller().active_pollings().is_empty());
        assert!(!context.tracker().is_visible());
        assert!(!upload.is_locked());
        assert_eq!(
            sink.count(|e| matches!(
                e,
                MonitorEvent::MonitoringStopped {
                    reason: StopReason::Shutdown,
                    ..
                }
            )),
            1
        );
    }
}
