//! Linear stage progression with elapsed-time tracking.

use super::progress::StageProgress;
use super::timer::spawn_ticker;
use super::types::{default_stages, Stage, StageId, StageStatus};
use super::upload_control::UploadControl;
use crate::config::StageConfig;
use crate::events::{EventSink, MonitorEvent};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

struct TrackerState {
    stages: Vec<Stage>,
    /// May point past the last stage after repeated advances.
    current: Option<usize>,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    visible: bool,
    ticker: Option<CancellationToken>,
    pending_unlock: Option<CancellationToken>,
}

impl TrackerState {
    fn new() -> Self {
        Self {
            stages: default_stages(),
            current: None,
            started_at: None,
            finished_at: None,
            visible: false,
            ticker: None,
            pending_unlock: None,
        }
    }

    fn stop_ticker(&mut self) {
        if let Some(token) = self.ticker.take() {
            token.cancel();
        }
    }

    fn cancel_pending_unlock(&mut self) {
        if let Some(token) = self.pending_unlock.take() {
            token.cancel();
        }
    }

    fn resolve(&self, stage: Option<StageId>) -> Option<usize> {
        match stage {
            Some(id) => Some(id.index()),
            None => self.current.filter(|&i| i < self.stages.len()),
        }
    }

    fn mark(&mut self, index: usize, status: StageStatus, detail: Option<&str>) -> MonitorEvent {
        let stage = &mut self.stages[index];
        stage.status = status;
        if let Some(detail) = detail {
            stage.detail = Some(detail.to_string());
        }
        MonitorEvent::StageChanged {
            stage: stage.id,
            status,
            detail: stage.detail.clone(),
        }
    }
}

/// Tracks the five processing stages of one upload at a time.
///
/// State changes are reported as [`MonitorEvent`]s after the internal lock is
/// released, so sinks may call back into the tracker.
pub struct StageTracker {
    state: Mutex<TrackerState>,
    config: StageConfig,
    upload: Arc<dyn UploadControl>,
    events: Arc<dyn EventSink>,
}

impl StageTracker {
    pub fn new(
        config: StageConfig,
        upload: Arc<dyn UploadControl>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            state: Mutex::new(TrackerState::new()),
            config,
            upload,
            events,
        }
    }

    /// Begins a new run: all stages pending, ticker started, uploads locked.
    pub fn start_processing(&self) {
        let started_at = Instant::now();
        let ticker = CancellationToken::new();

        {
            let mut state = self.state.lock();
            state.stop_ticker();
            state.cancel_pending_unlock();
            state.stages = default_stages();
            state.current = None;
            state.started_at = Some(started_at);
            state.finished_at = None;
            state.visible = true;
            state.ticker = Some(ticker.clone());
        }

        self.upload.lock_upload();
        self.events.emit(&MonitorEvent::ProcessingStarted);

        spawn_ticker(
            started_at,
            self.config.tick_interval(),
            Arc::clone(&self.events),
            ticker,
        );

        info!("Processing started");
    }

    /// Jumps to `stage`, or advances one stage when `None`, and marks it active.
    ///
    /// Jumps are not validated against the stage order. Advancing past the
    /// last stage is a no-op.
    pub fn next_stage(&self, stage: Option<StageId>, message: Option<&str>) {
        let event = {
            let mut state = self.state.lock();
            let index = match stage {
                Some(id) => id.index(),
                None => state.current.map_or(0, |i| i + 1),
            };
            state.current = Some(index);

            if index >= state.stages.len() {
                debug!(index, "No stage to advance to");
                return;
            }

            state.mark(index, StageStatus::Active, message)
        };

        if let MonitorEvent::StageChanged { stage, .. } = &event {
            debug!(stage = %stage, "Stage active");
        }
        self.events.emit(&event);
    }

    /// Marks `stage`, or the current stage, completed. No-op if neither exists.
    pub fn complete_stage(&self, stage: Option<StageId>) {
        let event = {
            let mut state = self.state.lock();
            let Some(index) = state.resolve(stage) else {
                return;
            };
            state.mark(index, StageStatus::Completed, None)
        };
        self.events.emit(&event);
    }

    /// Marks `stage`, or the current stage, errored. No-op if neither exists.
    pub fn error_stage(&self, stage: Option<StageId>, message: Option<&str>) {
        let event = {
            let mut state = self.state.lock();
            let Some(index) = state.resolve(stage) else {
                return;
            };
            state.mark(index, StageStatus::Error, message)
        };

        if let MonitorEvent::StageChanged { stage, detail, .. } = &event {
            warn!(stage = %stage, detail = ?detail, "Stage failed");
        }
        self.events.emit(&event);
    }

    /// Ends the run. On success every stage is marked completed. The ticker
    /// stops immediately; uploads unlock after the configured delay.
    pub fn finish_processing(&self, success: bool) {
        let unlock = CancellationToken::new();
        let mut changed = Vec::new();

        {
            let mut state = self.state.lock();
            if success {
                for index in 0..state.stages.len() {
                    if state.stages[index].status != StageStatus::Completed {
                        changed.push(state.mark(index, StageStatus::Completed, None));
                    }
                }
            }
            state.stop_ticker();
            state.finished_at = Some(Instant::now());
            state.cancel_pending_unlock();
            state.pending_unlock = Some(unlock.clone());
        }

        for event in &changed {
            self.events.emit(event);
        }
        self.events.emit(&MonitorEvent::ProcessingFinished { success });
        self.schedule_unlock(unlock);

        info!(success, "Processing finished");
    }

    /// Hides the stages, stops the ticker, restores every stage to pending
    /// and unlocks uploads immediately.
    pub fn reset(&self) {
        {
            let mut state = self.state.lock();
            state.stop_ticker();
            state.cancel_pending_unlock();
            *state = TrackerState::new();
        }

        self.upload.unlock_upload();
        self.events.emit(&MonitorEvent::StagesReset);
        debug!("Stages reset");
    }

    /// Copy of every stage in order.
    pub fn snapshot(&self) -> Vec<Stage> {
        self.state.lock().stages.clone()
    }

    pub fn stage(&self, id: StageId) -> Stage {
        self.state.lock().stages[id.index()].clone()
    }

    /// The active stage, if the current index points at one.
    pub fn current_stage(&self) -> Option<StageId> {
        let state = self.state.lock();
        state
            .current
            .and_then(|i| state.stages.get(i))
            .map(|stage| stage.id)
    }

    /// Time since `start_processing`, frozen once the run finishes.
    pub fn elapsed(&self) -> Option<Duration> {
        let state = self.state.lock();
        let started = state.started_at?;
        let end = state.finished_at.unwrap_or_else(Instant::now);
        Some(end.saturating_duration_since(started))
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().visible
    }

    /// True once the completed stage is completed or any stage has errored.
    pub fn is_settled(&self) -> bool {
        let state = self.state.lock();
        state.stages[StageId::Completed.index()].status == StageStatus::Completed
            || state.stages.iter().any(|s| s.status == StageStatus::Error)
    }

    fn schedule_unlock(&self, token: CancellationToken) {
        let delay = self.config.unlock_delay();
        let upload = Arc::clone(&self.upload);

        if delay.is_zero() {
            upload.unlock_upload();
            return;
        }

        let Ok(handle) = Handle::try_current() else {
            // Nothing to wait on; unlock now rather than never.
            upload.unlock_upload();
            return;
        };

        handle.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => upload.unlock_upload(),
            }
        });
    }
}

impl StageProgress for StageTracker {
    fn next_stage(&self, stage: Option<StageId>, message: Option<&str>) {
        StageTracker::next_stage(self, stage, message);
    }

    fn complete_stage(&self, stage: Option<StageId>) {
        StageTracker::complete_stage(self, stage);
    }

    fn error_stage(&self, stage: Option<StageId>, message: Option<&str>) {
        StageTracker::error_stage(self, stage, message);
    }

    fn finish_processing(&self, success: bool) {
        StageTracker::finish_processing(self, success);
    }
}

impl Drop for StageTracker {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        state.stop_ticker();
        state.cancel_pending_unlock();
    }
}
