//! Result document produced by the pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The downloaded result JSON.
///
/// Only the two top-level sections the client reads are typed; everything
/// else is kept in `extra` so the document can be saved unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Speech-to-text output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcripcion: Option<Value>,

    /// Content analysis output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analisis: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProcessingResult {
    /// Parses a result document. The body must be a JSON object.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    pub fn has_transcript(&self) -> bool {
        self.transcripcion.as_ref().is_some_and(|v| !v.is_null())
    }

    pub fn has_analysis(&self) -> bool {
        self.analisis.as_ref().is_some_and(|v| !v.is_null())
    }

    /// Transcript text, from `transcripcion.text` or `transcripcion.data.text`,
    /// or the section itself when it is a plain string.
    pub fn transcript_text(&self) -> Option<&str> {
        let section = self.transcripcion.as_ref()?;
        section
            .as_str()
            .or_else(|| section.get("text").and_then(Value::as_str))
            .or_else(|| section.pointer("/data/text").and_then(Value::as_str))
    }

    /// Summary from `analisis.resumen`.
    pub fn summary(&self) -> Option<&str> {
        self.analisis
            .as_ref()?
            .get("resumen")
            .and_then(Value::as_str)
    }

    /// Pretty-printed JSON of the whole document.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
