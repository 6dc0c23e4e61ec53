//! HTTP error types.

use thiserror::Error;

/// Errors raised by an [`AsyncHttpClient`](super::AsyncHttpClient).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// The underlying client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    /// The request could not be sent or no response arrived.
    #[error("Request failed: {0}")]
    Request(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be read.
    #[error("Failed to read response: {0}")]
    Body(String),
}

impl HttpError {
    /// Returns the HTTP status code, if the server responded at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = HttpError::Status {
            status: 404,
            url: "https://status.example.com/v1/status/uploads/a.wav".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 404 from https://status.example.com/v1/status/uploads/a.wav"
        );
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn test_request_error_has_no_status() {
        let err = HttpError::Request("connection refused".to_string());
        assert_eq!(err.status_code(), None);
        assert!(err.to_string().contains("connection refused"));
    }
}
