//! Event payloads.

use crate::results::ProcessingResult;
use crate::stages::{StageId, StageStatus};
use crate::status::{FileKey, Phase, StopReason};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Something observable happened during monitoring.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// A session was registered for a file.
    MonitoringStarted { file_key: FileKey },

    /// A status check succeeded.
    StatusReceived {
        file_key: FileKey,
        phase: Phase,
        progress: Option<f64>,
        message: Option<String>,
    },

    /// A status check failed (network, HTTP status or body).
    CheckFailed {
        file_key: FileKey,
        error: String,
        consecutive_errors: u32,
        total_errors: u32,
        /// Backoff computed for this failure
        backoff: Duration,
    },

    /// A session ended and was removed from the registry.
    MonitoringStopped { file_key: FileKey, reason: StopReason },

    /// The final result was downloaded and handed to the presenter.
    ResultReady {
        file_key: FileKey,
        result: Arc<ProcessingResult>,
    },

    /// The final result could not be downloaded or parsed.
    ResultFailed { file_key: FileKey, error: String },

    /// The stage tracker began a new run.
    ProcessingStarted,

    /// A stage changed status.
    StageChanged {
        stage: StageId,
        status: StageStatus,
        detail: Option<String>,
    },

    /// Elapsed time since processing started, once per tick.
    ElapsedTick { elapsed: Duration },

    /// The stage tracker finished a run.
    ProcessingFinished { success: bool },

    /// The stage tracker was reset to its initial state.
    StagesReset,
}

impl MonitorEvent {
    /// Returns the file key for events tied to one session.
    pub fn file_key(&self) -> Option<&FileKey> {
        match self {
            Self::MonitoringStarted { file_key }
            | Self::StatusReceived { file_key, .. }
            | Self::CheckFailed { file_key, .. }
            | Self::MonitoringStopped { file_key, .. }
            | Self::ResultReady { file_key, .. }
            | Self::ResultFailed { file_key, .. } => Some(file_key),
            _ => None,
        }
    }
}

impl fmt::Display for MonitorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MonitoringStarted { file_key } => write!(f, "monitoring started for {}", file_key),
            Self::StatusReceived {
                file_key,
                phase,
                progress,
                ..
            } => match progress {
                Some(p) => write!(f, "{}: {} ({:.0}%)", file_key, phase, p),
                None => write!(f, "{}: {}", file_key, phase),
            },
            Self::CheckFailed {
                file_key,
                error,
                consecutive_errors,
                total_errors,
                ..
            } => write!(
                f,
                "{}: check failed ({}/{}): {}",
                file_key, consecutive_errors, total_errors, error
            ),
            Self::MonitoringStopped { file_key, reason } => {
                write!(f, "monitoring stopped for {}: {}", file_key, reason)
            }
            Self::ResultReady { file_key, .. } => write!(f, "result ready for {}", file_key),
            Self::ResultFailed { file_key, error } => {
                write!(f, "result failed for {}: {}", file_key, error)
            }
            Self::ProcessingStarted => f.write_str("processing started"),
            Self::StageChanged { stage, status, .. } => write!(f, "{} -> {}", stage, status),
            Self::ElapsedTick { elapsed } => {
                write!(f, "elapsed {}", crate::stages::format_elapsed(*elapsed))
            }
            Self::ProcessingFinished { success } => {
                write!(f, "processing finished (success={})", success)
            }
            Self::StagesReset => f.write_str("stages reset"),
        }
    }
}
