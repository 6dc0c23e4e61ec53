//! Status check errors.

use crate::http::HttpError;
use thiserror::Error;

/// A status check that did not produce a usable payload.
///
/// Every variant counts as one polling error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    /// Network failure or non-2xx response.
    #[error("{0}")]
    Http(#[from] HttpError),

    /// The body was not a JSON status payload.
    #[error("Invalid status response: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for StatusError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
