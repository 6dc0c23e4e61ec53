//! Stage progress interface driven by the status poller.

use super::StageId;

/// Operations the poller uses to report processing progress.
///
/// [`StageTracker`](super::StageTracker) is the production implementation.
pub trait StageProgress: Send + Sync {
    /// Jumps to `stage` if given, otherwise advances one stage, and marks it active.
    fn next_stage(&self, stage: Option<StageId>, message: Option<&str>);

    /// Marks `stage` (or the current stage) completed.
    fn complete_stage(&self, stage: Option<StageId>);

    /// Marks `stage` (or the current stage) errored.
    fn error_stage(&self, stage: Option<StageId>, message: Option<&str>);

    /// Ends the run.
    fn finish_processing(&self, success: bool);
}

/// Progress sink that ignores every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStageProgress;

impl StageProgress for NoOpStageProgress {
    fn next_stage(&self, _stage: Option<StageId>, _message: Option<&str>) {}
    fn complete_stage(&self, _stage: Option<StageId>) {}
    fn error_stage(&self, _stage: Option<StageId>, _message: Option<&str>) {}
    fn finish_processing(&self, _success: bool) {}
}
