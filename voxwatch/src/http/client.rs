//! HTTP client abstraction for testability

use super::error::HttpError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Default request timeout for status and result requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for asynchronous HTTP GET operations.
///
/// Implementations must treat any non-2xx response as an error so callers
/// only ever see successful bodies.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;

    /// Performs an async HTTP GET request with custom headers.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `headers` - Slice of (header_name, header_value) tuples
    fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;
}

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new client with the default 30 second timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a new client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("voxwatch/", env!("CARGO_PKG_VERSION")))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<Vec<u8>, HttpError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match request.send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(HttpError::Request(e.to_string()));
            }
        };

        if !response.status().is_success() {
            warn!(
                url = url,
                status = response.status().as_u16(),
                "HTTP error status"
            );
            return Err(HttpError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(HttpError::Body(e.to_string()))
            }
        }
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        self.execute(self.client.get(url), url).await
    }

    async fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>, HttpError> {
        let mut request = self.client.get(url);

        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        self.execute(request, url).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Scripted async HTTP client for tests.
    ///
    /// Responses are handed out in order; once the script runs dry every
    /// request fails with a connection error.
    #[derive(Default)]
    pub(crate) struct ScriptedHttpClient {
        responses: Mutex<VecDeque<Result<Vec<u8>, HttpError>>>,
        requests: Mutex<Vec<String>>,
    }

    impl ScriptedHttpClient {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn push_json(&self, body: &str) {
            self.responses.lock().push_back(Ok(body.as_bytes().to_vec()));
        }

        pub(crate) fn push_error(&self, error: HttpError) {
            self.responses.lock().push_back(Err(error));
        }

        pub(crate) fn requests(&self) -> Vec<String> {
            self.requests.lock().clone()
        }

        fn next(&self, url: &str) -> Result<Vec<u8>, HttpError> {
            self.requests.lock().push(url.to_string());
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::Request("script exhausted".to_string())))
        }
    }

    impl AsyncHttpClient for ScriptedHttpClient {
        async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
            self.next(url)
        }

        async fn get_with_headers(
            &self,
            url: &str,
            _headers: &[(&str, &str)],
        ) -> Result<Vec<u8>, HttpError> {
            self.next(url)
        }
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(AsyncReqwestClient::new().is_ok());
        assert!(AsyncReqwestClient::with_timeout(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_scripted_client_returns_in_order() {
        let client = ScriptedHttpClient::new();
        client.push_json(r#"{"a":1}"#);
        client.push_error(HttpError::Status {
            status: 500,
            url: "http://x".to_string(),
        });

        assert_eq!(client.get("http://x").await.unwrap(), br#"{"a":1}"#.to_vec());
        assert!(matches!(
            client.get("http://x").await,
            Err(HttpError::Status { status: 500, .. })
        ));
        assert!(matches!(
            client.get("http://x").await,
            Err(HttpError::Request(_))
        ));
        assert_eq!(client.requests().len(), 3);
    }
}
