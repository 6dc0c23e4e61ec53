//! Maps status payloads to stage actions.
//!
//! Interpretation is pure: [`StatusInterpreter::interpret`] returns what
//! should happen and [`StatusInterpreter::apply`] performs the stage half of
//! it. The poller performs the continuation half.

use super::{Phase, StatusPayload, StopReason};
use crate::stages::{StageId, StageProgress};
use tracing::{debug, info, warn};

const TRANSCRIBING_MESSAGE: &str = "Transcribing audio...";
const ANALYZING_MESSAGE: &str = "Analyzing content...";

/// One call against [`StageProgress`].
#[derive(Debug, Clone, PartialEq)]
pub enum StageAction {
    /// Mark a stage completed.
    Complete(StageId),
    /// Make a stage current and active.
    Advance {
        stage: StageId,
        message: Option<String>,
    },
    /// Mark the current stage errored.
    Fail { message: String },
    /// End the run.
    Finish { success: bool },
}

/// Whether polling continues after a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    Continue,
    Stop(StopReason),
}

/// Result of interpreting one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub actions: Vec<StageAction>,
    pub continuation: Continuation,
}

impl Interpretation {
    /// True when the payload reported COMPLETED and the result should be fetched.
    pub fn is_completed(&self) -> bool {
        self.continuation == Continuation::Stop(StopReason::Completed)
    }
}

/// Stateless phase table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusInterpreter;

impl StatusInterpreter {
    pub fn interpret(payload: &StatusPayload) -> Interpretation {
        use StageAction::*;

        let actions = match &payload.status {
            Phase::Pending => {
                debug!("Queued, waiting for processing to start");
                vec![Complete(StageId::Trigger)]
            }
            Phase::Starting => vec![Advance {
                stage: StageId::Transcribing,
                message: None,
            }],
            Phase::Transcribing => vec![Advance {
                stage: StageId::Transcribing,
                message: Some(TRANSCRIBING_MESSAGE.to_string()),
            }],
            Phase::TranscriptionCompleted => vec![
                Complete(StageId::Transcribing),
                Advance {
                    stage: StageId::Analyzing,
                    message: None,
                },
            ],
            Phase::Analyzing => vec![Advance {
                stage: StageId::Analyzing,
                message: Some(ANALYZING_MESSAGE.to_string()),
            }],
            Phase::Completed => {
                info!(tiempo_total = ?payload.tiempo_total, "Processing completed");
                return Interpretation {
                    actions: vec![
                        Complete(StageId::Analyzing),
                        Advance {
                            stage: StageId::Completed,
                            message: None,
                        },
                    ],
                    continuation: Continuation::Stop(StopReason::Completed),
                };
            }
            Phase::Error => {
                let message = payload.message.as_deref().unwrap_or("unknown error");
                warn!(message = message, "Processing failed");
                return Interpretation {
                    actions: vec![
                        Fail {
                            message: format!("Processing error: {}", message),
                        },
                        Finish { success: false },
                    ],
                    continuation: Continuation::Stop(StopReason::ProcessingError),
                };
            }
            Phase::Unknown(status) => {
                warn!(status = status.as_str(), "Unknown processing status");
                Vec::new()
            }
        };

        let continuation = if payload.polling_recommended {
            Continuation::Continue
        } else {
            info!(status = %payload.status, "Polling not recommended, stopping");
            Continuation::Stop(StopReason::PollingNotRecommended)
        };

        Interpretation {
            actions,
            continuation,
        }
    }

    /// Performs `actions` in order.
    pub fn apply(actions: &[StageAction], progress: &dyn StageProgress) {
        for action in actions {
            match action {
                StageAction::Complete(stage) => progress.complete_stage(Some(*stage)),
                StageAction::Advance { stage, message } => {
                    progress.next_stage(Some(*stage), message.as_deref())
                }
                StageAction::Fail { message } => progress.error_stage(None, Some(message)),
                StageAction::Finish { success } => progress.finish_processing(*success),
            }
        }
    }
}
