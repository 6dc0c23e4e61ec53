//! Processing stage state machine.
//!
//! Five fixed stages (upload, trigger, transcribing, analyzing, completed)
//! advanced by the status poller through the [`StageProgress`] trait. The
//! tracker also owns the elapsed-time ticker and the upload lock.

mod progress;
mod timer;
mod tracker;
mod types;
mod upload_control;

pub use progress::{NoOpStageProgress, StageProgress};
pub use timer::format_elapsed;
pub use tracker::StageTracker;
pub use types::{default_stages, Stage, StageId, StageStatus};
pub use upload_control::{NoOpUploadControl, UploadControl};

#[cfg(test)]
pub(crate) use tracker::tests::CountingUploadControl;
