//! Status payload returned by the remote status endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing phase reported by the remote pipeline.
///
/// Unrecognised strings are preserved in [`Phase::Unknown`] so they can be
/// logged verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Phase {
    /// Queued, processing has not started yet
    Pending,
    /// The pipeline picked the file up
    Starting,
    /// Speech-to-text is running
    Transcribing,
    /// Speech-to-text finished, analysis not started
    TranscriptionCompleted,
    /// Content analysis is running
    Analyzing,
    /// All work finished; result links are available
    Completed,
    /// The pipeline failed
    Error,
    /// Any other status string
    Unknown(String),
}

impl Phase {
    /// Parses a status string. Matching is exact, as sent by the endpoint.
    pub fn parse(value: &str) -> Self {
        match value {
            "PENDING" => Self::Pending,
            "STARTING" => Self::Starting,
            "TRANSCRIBING" => Self::Transcribing,
            "TRANSCRIPTION_COMPLETED" => Self::TranscriptionCompleted,
            "ANALYZING" => Self::Analyzing,
            "COMPLETED" => Self::Completed,
            "ERROR" => Self::Error,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Returns the wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Starting => "STARTING",
            Self::Transcribing => "TRANSCRIBING",
            Self::TranscriptionCompleted => "TRANSCRIPTION_COMPLETED",
            Self::Analyzing => "ANALYZING",
            Self::Completed => "COMPLETED",
            Self::Error => "ERROR",
            Self::Unknown(value) => value,
        }
    }

    /// Returns true for phases that end polling permanently.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<String> for Phase {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Phase> for String {
    fn from(phase: Phase) -> Self {
        phase.as_str().to_string()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a status response.
///
/// Field names follow the endpoint's JSON. Fields the client does not use are
/// ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub status: Phase,

    /// Progress percentage, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Whether the endpoint expects further polling. Absent means `false`.
    #[serde(default)]
    pub polling_recommended: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Presigned link to the full result JSON (COMPLETED only, ~1h lifetime).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resultado_download_url: Option<String>,

    /// Presigned link to the raw transcription (COMPLETED only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcripcion_download_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resultado_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcripcion_key: Option<String>,

    /// Total processing time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiempo_total: Option<f64>,
}

impl StatusPayload {
    /// Parses a payload from a JSON body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Progress clamped to 0-100, if reported.
    pub fn progress_percent(&self) -> Option<f64> {
        self.progress.map(|p| p.clamp(0.0, 100.0))
    }
}
