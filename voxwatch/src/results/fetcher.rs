//! Result file download.

use super::types::ProcessingResult;
use crate::http::{AsyncHttpClient, HttpError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while retrieving or presenting the final result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResultError {
    /// The download request failed or returned a non-2xx status.
    #[error("{0}")]
    Http(#[from] HttpError),

    /// The body was not a JSON result document.
    #[error("Invalid result document: {0}")]
    Parse(String),

    /// The presenter could not show the result.
    #[error("Could not show results: {0}")]
    Presentation(String),
}

/// Downloads the result document behind a presigned URL.
pub struct ResultFetcher<C> {
    client: Arc<C>,
}

impl<C> Clone for ResultFetcher<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: AsyncHttpClient> ResultFetcher<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Downloads and parses the result at `url`.
    ///
    /// The URL is used as given; presigned links carry their signature in
    /// the query string.
    pub async fn download_result_file(&self, url: &str) -> Result<ProcessingResult, ResultError> {
        debug!(url = url, "Downloading result");

        let body = self.client.get(url).await.map_err(|e| {
            warn!(error = %e, "Result download failed");
            ResultError::from(e)
        })?;

        let result = ProcessingResult::from_slice(&body).map_err(|e| {
            warn!(error = %e, bytes = body.len(), "Result document is not valid JSON");
            ResultError::Parse(e.to_string())
        })?;

        info!(
            bytes = body.len(),
            has_transcript = result.has_transcript(),
            has_analysis = result.has_analysis(),
            "Result downloaded"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::ScriptedHttpClient;

    #[tokio::test]
    async fn test_download_parses_document() {
        let client = Arc::new(ScriptedHttpClient::new());
        client.push_json(r#"{"transcripcion": {"text": "hi"}}"#);
        let fetcher = ResultFetcher::new(client.clone());

        let result = fetcher
            .download_result_file("https://bucket/results/a.json?X-Amz-Signature=abc")
            .await
            .unwrap();

        assert_eq!(result.transcript_text(), Some("hi"));
        assert_eq!(
            client.requests(),
            vec!["https://bucket/results/a.json?X-Amz-Signature=abc".to_string()]
        );
    }

    #[tokio::test]
    async fn test_http_status_failure() {
        let client = Arc::new(ScriptedHttpClient::new());
        client.push_error(HttpError::Status {
            status: 403,
            url: "https://bucket/expired".to_string(),
        });
        let fetcher = ResultFetcher::new(client);

        let err = fetcher
            .download_result_file("https://bucket/expired")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "HTTP 403 from https://bucket/expired");
    }

    #[tokio::test]
    async fn test_invalid_body_failure() {
        let client = Arc::new(ScriptedHttpClient::new());
        client.push_json("<Error>AccessDenied</Error>");
        let fetcher = ResultFetcher::new(client);

        let err = fetcher.download_result_file("https://x").await.unwrap_err();
        assert!(matches!(err, ResultError::Parse(_)));
    }
}
