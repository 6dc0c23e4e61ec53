//! Normalised object-storage keys for uploaded files.

use std::fmt;
use thiserror::Error;

/// Prefix under which uploaded audio files are stored.
pub const UPLOADS_PREFIX: &str = "uploads/";

/// Errors produced while normalising a file key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileKeyError {
    /// The key was empty (or only whitespace / only the prefix).
    #[error("file key is required")]
    Empty,
}

/// Storage key of an uploaded file, always of the form `uploads/<name>`.
///
/// Normalisation is idempotent: `a.wav`, `uploads/a.wav` and
/// `FileKey::normalize("uploads/a.wav")?.as_str()` all yield `uploads/a.wav`.
/// Inner path separators are preserved as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileKey(String);

impl FileKey {
    /// Normalises a raw key as reported by the upload collaborator.
    pub fn normalize(raw: &str) -> Result<Self, FileKeyError> {
        let trimmed = raw.trim();
        let name = trimmed.strip_prefix(UPLOADS_PREFIX).unwrap_or(trimmed);

        if name.is_empty() {
            return Err(FileKeyError::Empty);
        }

        Ok(Self(format!("{}{}", UPLOADS_PREFIX, name)))
    }

    /// Returns the full key, including the `uploads/` prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the key without the `uploads/` prefix.
    pub fn name(&self) -> &str {
        &self.0[UPLOADS_PREFIX.len()..]
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FileKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
