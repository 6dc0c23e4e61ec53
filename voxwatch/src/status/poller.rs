//! Status polling loop with bounded-error backoff.
//!
//! Each monitored file gets one [`PollSession`] and one spawned task. The task
//! evaluates the stop limits, then awaits a status check, on every tick. A
//! check is never started while another check for the same session is in
//! flight, and ticks that fall due meanwhile are dropped.

use super::interpreter::{Continuation, StatusInterpreter};
use super::limits::{compute_backoff, error_limit, evaluate_limits};
use super::registry::{ActivePolling, PollRegistry, PollSession, RegistryError};
use super::{FileKey, Phase, StatusError, StatusPayload, StopReason};
use crate::config::{BackoffPolicy, PollingConfig};
use crate::events::{EventSink, MonitorEvent, NoOpSink};
use crate::http::AsyncHttpClient;
use crate::results::{NoOpPresenter, ResultError, ResultFetcher, ResultPresenter};
use crate::stages::{NoOpStageProgress, StageId, StageProgress};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

const STATUS_HEADERS: [(&str, &str); 2] = [
    ("Accept", "application/json"),
    ("Content-Type", "application/json"),
];

/// Result of [`StatusPoller::start_monitoring`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new session was created and its first check has run.
    Started(FileKey),
    /// A session for this key already exists; nothing changed.
    AlreadyActive(FileKey),
    /// The key was empty.
    InvalidKey,
}

/// Result of one status check.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// Payload processed; polling continues.
    Continue(Phase),
    /// The check failed; polling continues.
    Failed {
        consecutive_errors: u32,
        total_errors: u32,
        /// Computed delay; applied only under [`BackoffPolicy::Reschedule`].
        backoff: Duration,
    },
    /// The session was stopped by this check.
    Stopped(StopReason),
    /// The session was stopped while the request was in flight.
    Ignored,
    /// Another check for the same session was in flight.
    Skipped,
    /// No session exists for the key.
    Inactive,
}

struct PollerInner<C> {
    client: Arc<C>,
    fetcher: ResultFetcher<C>,
    config: PollingConfig,
    registry: PollRegistry,
    stages: Arc<dyn StageProgress>,
    presenter: Arc<dyn ResultPresenter>,
    events: Arc<dyn EventSink>,
}

/// Polls the status endpoint for any number of files.
///
/// Cloning is cheap; clones share sessions.
pub struct StatusPoller<C> {
    inner: Arc<PollerInner<C>>,
}

impl<C> Clone for StatusPoller<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Builder for [`StatusPoller`]. Collaborators default to no-ops.
pub struct StatusPollerBuilder<C> {
    client: Arc<C>,
    config: PollingConfig,
    stages: Arc<dyn StageProgress>,
    presenter: Arc<dyn ResultPresenter>,
    events: Arc<dyn EventSink>,
}

impl<C: AsyncHttpClient + 'static> StatusPollerBuilder<C> {
    pub fn with_stages(mut self, stages: Arc<dyn StageProgress>) -> Self {
        self.stages = stages;
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

    pub fn build(self) -> StatusPoller<C> {
        info!(
            api_url = self.config.api_url(),
            interval_ms = self.config.interval().as_millis() as u64,
            max_polling_time_secs = self.config.max_polling_time().as_secs(),
            max_consecutive_errors = self.config.max_consecutive_errors(),
            max_total_errors = self.config.max_total_errors(),
            backoff_policy = %self.config.backoff_policy(),
            "Status poller initialized"
        );

        StatusPoller {
            inner: Arc::new(PollerInner {
                fetcher: ResultFetcher::new(Arc::clone(&self.client)),
                client: self.client,
                config: self.config,
                registry: PollRegistry::new(),
                stages: self.stages,
                presenter: self.presenter,
                events: self.events,
            }),
        }
    }
}

impl<C: AsyncHttpClient + 'static> StatusPoller<C> {
    pub fn builder(client: Arc<C>, config: PollingConfig) -> StatusPollerBuilder<C> {
        StatusPollerBuilder {
            client,
            config,
            stages: Arc::new(NoOpStageProgress),
            presenter: Arc::new(NoOpPresenter),
            events: Arc::new(NoOpSink),
        }
    }

    /// Poller with no collaborators attached.
    pub fn new(client: Arc<C>, config: PollingConfig) -> Self {
        Self::builder(client, config).build()
    }

    /// Starts monitoring `file_key`.
    ///
    /// The key is normalised to `uploads/<name>`. The first check runs before
    /// this returns; recurring checks are then scheduled every
    /// `config.interval()` unless that first check already ended the session.
    pub async fn start_monitoring(&self, file_key: &str) -> StartOutcome {
        let file_key = match FileKey::normalize(file_key) {
            Ok(key) => key,
            Err(e) => {
                error!(error = %e, "Cannot start monitoring");
                return StartOutcome::InvalidKey;
            }
        };

        let session = match self.inner.registry.add(file_key.clone()) {
            Ok(session) => session,
            Err(RegistryError::AlreadyActive(key)) => {
                warn!(file_key = %key, "Monitoring already active for this file");
                return StartOutcome::AlreadyActive(key);
            }
        };

        info!(file_key = %file_key, "Monitoring started");
        self.inner.events.emit(&MonitorEvent::MonitoringStarted {
            file_key: file_key.clone(),
        });

        self.inner.check_session(&session).await;

        if session.is_cancelled() {
            debug!(file_key = %file_key, "Session ended on first check, not scheduling");
            return StartOutcome::Started(file_key);
        }

        let inner = Arc::clone(&self.inner);
        let task_session = Arc::clone(&session);
        tokio::spawn(async move { inner.run(task_session).await });
        session.mark_scheduled();

        debug!(
            file_key = %file_key,
            interval_ms = self.inner.config.interval().as_millis() as u64,
            "Recurring checks scheduled"
        );

        StartOutcome::Started(file_key)
    }

    /// Runs one check for an active session outside the schedule.
    pub async fn check_status(&self, file_key: &FileKey) -> CheckOutcome {
        match self.inner.registry.get(file_key) {
            Some(session) => self.inner.check_session(&session).await,
            None => CheckOutcome::Inactive,
        }
    }

    /// Fetches and parses the status for any key without touching sessions.
    pub async fn fetch_status(&self, file_key: &FileKey) -> Result<StatusPayload, StatusError> {
        self.inner.fetch_status(&self.status_url(file_key)).await
    }

    /// Stops monitoring `file_key`. Returns false if nothing was active.
    pub fn stop_monitoring(&self, file_key: &FileKey, reason: StopReason) -> bool {
        match self.inner.registry.remove(file_key) {
            Some(session) => {
                session.cancel();
                self.inner.report_stopped(&session, reason);
                true
            }
            None => false,
        }
    }

    /// Stops every session. Returns how many were stopped.
    pub fn stop_all_monitoring(&self) -> usize {
        let sessions = self.inner.registry.drain();
        for session in &sessions {
            session.cancel();
            self.inner.report_stopped(session, StopReason::Shutdown);
        }
        if !sessions.is_empty() {
            info!(count = sessions.len(), "All monitoring stopped");
        }
        sessions.len()
    }

    pub fn active_pollings(&self) -> Vec<ActivePolling> {
        self.inner.registry.list_active()
    }

    pub fn is_monitoring(&self, file_key: &FileKey) -> bool {
        self.inner.registry.contains(file_key)
    }

    pub fn session(&self, file_key: &FileKey) -> Option<Arc<PollSession>> {
        self.inner.registry.get(file_key)
    }

    /// `{api_url}/{file_key}` with the key's separators left unencoded.
    pub fn status_url(&self, file_key: &FileKey) -> String {
        self.inner.status_url(file_key)
    }

    pub fn config(&self) -> &PollingConfig {
        &self.inner.config
    }

    pub fn debug_info(&self) -> PollerDebugInfo {
        PollerDebugInfo {
            api_url: self.inner.config.api_url().to_string(),
            interval: self.inner.config.interval(),
            max_polling_time: self.inner.config.max_polling_time(),
            max_consecutive_errors: self.inner.config.max_consecutive_errors(),
            max_total_errors: self.inner.config.max_total_errors(),
            backoff_policy: self.inner.config.backoff_policy(),
            active: self.active_pollings(),
        }
    }
}

impl<C: AsyncHttpClient + 'static> PollerInner<C> {
    fn status_url(&self, file_key: &FileKey) -> String {
        format!("{}/{}", self.config.api_url(), file_key.as_str())
    }

    /// Recurring check loop for one session.
    async fn run(self: Arc<Self>, session: Arc<PollSession>) {
        let period = self.config.interval();
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let shutdown = session.token().clone();

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,

                _ = interval.tick() => {
                    if let Some(reason) = evaluate_limits(
                        &self.config,
                        session.elapsed(),
                        session.consecutive_errors(),
                        session.total_errors(),
                    ) {
                        self.stop_session(&session, reason);
                        break;
                    }

                    match self.check_session(&session).await {
                        CheckOutcome::Failed { backoff, .. }
                            if self.config.backoff_policy() == BackoffPolicy::Reschedule =>
                        {
                            interval.reset_after(backoff);
                        }
                        CheckOutcome::Stopped(_) | CheckOutcome::Ignored | CheckOutcome::Inactive => {
                            break
                        }
                        _ => {}
                    }
                }
            }
        }

        debug!(file_key = %session.file_key(), "Polling task exited");
    }

    async fn check_session(&self, session: &Arc<PollSession>) -> CheckOutcome {
        let Some(_guard) = session.try_begin_check() else {
            debug!(file_key = %session.file_key(), "Check already in flight, skipping");
            return CheckOutcome::Skipped;
        };

        let url = self.status_url(session.file_key());
        debug!(file_key = %session.file_key(), url = %url, "Checking status");

        let result = self.fetch_status(&url).await;

        if session.is_cancelled() || !self.registry.is_current(session) {
            debug!(file_key = %session.file_key(), "Session stopped during check, response ignored");
            return CheckOutcome::Ignored;
        }

        match result {
            Ok(payload) => {
                session.record_success();
                self.process_status_response(session, payload).await
            }
            Err(e) => self.handle_polling_error(session, &e),
        }
    }

    async fn fetch_status(&self, url: &str) -> Result<StatusPayload, StatusError> {
        let body = self.client.get_with_headers(url, &STATUS_HEADERS).await?;
        Ok(StatusPayload::from_slice(&body)?)
    }

    async fn process_status_response(
        &self,
        session: &Arc<PollSession>,
        payload: StatusPayload,
    ) -> CheckOutcome {
        info!(
            file_key = %session.file_key(),
            status = %payload.status,
            progress = ?payload.progress,
            message = ?payload.message,
            timestamp = ?payload.timestamp,
            polling_recommended = payload.polling_recommended,
            "Status received"
        );

        self.events.emit(&MonitorEvent::StatusReceived {
            file_key: session.file_key().clone(),
            phase: payload.status.clone(),
            progress: payload.progress_percent(),
            message: payload.message.clone(),
        });

        let interpretation = StatusInterpreter::interpret(&payload);
        StatusInterpreter::apply(&interpretation.actions, self.stages.as_ref());

        match interpretation.continuation {
            Continuation::Continue => CheckOutcome::Continue(payload.status),
            Continuation::Stop(reason) => {
                self.stop_session(session, reason);
                if interpretation.is_completed() {
                    self.handle_completed_processing(session.file_key(), &payload)
                        .await;
                }
                CheckOutcome::Stopped(reason)
            }
        }
    }

    fn handle_polling_error(&self, session: &Arc<PollSession>, err: &StatusError) -> CheckOutcome {
        let (consecutive, total) = session.record_failure();
        let backoff = compute_backoff(
            self.config.interval(),
            consecutive,
            self.config.backoff_factor(),
            self.config.max_backoff(),
        );

        error!(
            file_key = %session.file_key(),
            error = %err,
            consecutive_errors = consecutive,
            max_consecutive_errors = self.config.max_consecutive_errors(),
            total_errors = total,
            max_total_errors = self.config.max_total_errors(),
            secs_since_last_success = session.time_since_last_success().as_secs(),
            "Status check failed"
        );

        self.events.emit(&MonitorEvent::CheckFailed {
            file_key: session.file_key().clone(),
            error: err.to_string(),
            consecutive_errors: consecutive,
            total_errors: total,
            backoff,
        });

        if let Some(reason) = error_limit(&self.config, consecutive, total) {
            self.stop_session(session, reason);
            return CheckOutcome::Stopped(reason);
        }

        warn!(
            file_key = %session.file_key(),
            backoff_ms = backoff.as_millis() as u64,
            policy = %self.config.backoff_policy(),
            "Retrying after backoff"
        );

        CheckOutcome::Failed {
            consecutive_errors: consecutive,
            total_errors: total,
            backoff,
        }
    }

    async fn handle_completed_processing(&self, file_key: &FileKey, payload: &StatusPayload) {
        info!(
            file_key = %file_key,
            resultado_key = ?payload.resultado_key,
            transcripcion_key = ?payload.transcripcion_key,
            tiempo_total = ?payload.tiempo_total,
            resultado_download_url = ?payload.resultado_download_url,
            transcripcion_download_url = ?payload.transcripcion_download_url,
            "Processing finished, download links expire in one hour"
        );

        let url = payload
            .resultado_download_url
            .as_deref()
            .filter(|url| !url.is_empty());

        let Some(url) = url else {
            self.stages.complete_stage(Some(StageId::Completed));
            self.stages.finish_processing(true);
            return;
        };

        let outcome = match self.fetcher.download_result_file(url).await {
            Ok(result) => self
                .presenter
                .show_final_results(&result)
                .map(|()| result),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(result) => {
                self.events.emit(&MonitorEvent::ResultReady {
                    file_key: file_key.clone(),
                    result: Arc::new(result),
                });
                self.stages.complete_stage(Some(StageId::Completed));
                self.stages.finish_processing(true);
            }
            Err(e) => {
                let message = match &e {
                    ResultError::Presentation(_) => format!("Error showing results: {}", e),
                    _ => format!("Error downloading result: {}", e),
                };
                error!(file_key = %file_key, error = %e, "Result retrieval failed");

                self.events.emit(&MonitorEvent::ResultFailed {
                    file_key: file_key.clone(),
                    error: e.to_string(),
                });
                self.stages
                    .error_stage(Some(StageId::Completed), Some(&message));
                self.stages.finish_processing(false);
            }
        }
    }

    /// Cancels `session` and removes it if it is still registered.
    fn stop_session(&self, session: &Arc<PollSession>, reason: StopReason) -> bool {
        session.cancel();
        if self.registry.remove_session(session) {
            self.report_stopped(session, reason);
            true
        } else {
            false
        }
    }

    fn report_stopped(&self, session: &PollSession, reason: StopReason) {
        if reason.is_failure() {
            warn!(
                file_key = %session.file_key(),
                reason = %reason,
                elapsed_secs = session.elapsed().as_secs(),
                total_errors = session.total_errors(),
                "Monitoring stopped"
            );
        } else {
            info!(
                file_key = %session.file_key(),
                reason = %reason,
                elapsed_secs = session.elapsed().as_secs(),
                "Monitoring stopped"
            );
        }

        self.events.emit(&MonitorEvent::MonitoringStopped {
            file_key: session.file_key().clone(),
            reason,
        });
    }
}

/// Snapshot of poller settings and sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct PollerDebugInfo {
    pub api_url: String,
    pub interval: Duration,
    pub max_polling_time: Duration,
    pub max_consecutive_errors: u32,
    pub max_total_errors: u32,
    pub backoff_policy: BackoffPolicy,
    pub active: Vec<ActivePolling>,
}

impl fmt::Display for PollerDebugInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "API base URL:       {}", self.api_url)?;
        writeln!(f, "Polling interval:   {:.1}s", self.interval.as_secs_f64())?;
        writeln!(f, "Max polling time:   {}s", self.max_polling_time.as_secs())?;
        writeln!(
            f,
            "Error limits:       {} consecutive / {} total",
            self.max_consecutive_errors, self.max_total_errors
        )?;
        writeln!(f, "Backoff policy:     {}", self.backoff_policy)?;
        write!(f, "Active pollings:    {}", self.active.len())?;
        for polling in &self.active {
            write!(
                f,
                "\n  {}  {}s  {}",
                polling.file_key,
                polling.elapsed.as_secs(),
                if polling.is_active { "scheduled" } else { "starting" }
            )?;
        }
        Ok(())
    }
}
