//! Status poller configuration.

use super::defaults::{
    DEFAULT_API_URL, DEFAULT_BACKOFF_FACTOR, DEFAULT_BACKOFF_POLICY, DEFAULT_MAX_BACKOFF_MS,
    DEFAULT_MAX_CONSECUTIVE_ERRORS, DEFAULT_MAX_POLLING_TIME_SECS, DEFAULT_MAX_TOTAL_ERRORS,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// What the poller does with the backoff delay computed after a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackoffPolicy {
    /// Keep the fixed cadence; the delay is only computed and logged.
    #[default]
    Advisory,
    /// Push the next check out by the computed delay.
    Reschedule,
}

impl BackoffPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Advisory => "advisory",
            Self::Reschedule => "reschedule",
        }
    }
}

impl FromStr for BackoffPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "advisory" => Ok(Self::Advisory),
            "reschedule" => Ok(Self::Reschedule),
            other => Err(format!(
                "unknown backoff policy '{}', expected 'advisory' or 'reschedule'",
                other
            )),
        }
    }
}

impl fmt::Display for BackoffPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for [`StatusPoller`](crate::status::StatusPoller).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use voxwatch::config::{BackoffPolicy, PollingConfig};
///
/// let config = PollingConfig::default();
/// assert_eq!(config.interval(), Duration::from_secs(3));
/// assert_eq!(config.max_consecutive_errors(), 5);
///
/// let config = PollingConfig::new()
///     .with_api_url("https://api.example.com/v1/status/")
///     .with_backoff_policy(BackoffPolicy::Reschedule);
/// assert_eq!(config.api_url(), "https://api.example.com/v1/status");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PollingConfig {
    /// Base URL of the status endpoint, without trailing slash
    api_url: String,
    /// Timeout for each status/result request
    request_timeout: Duration,
    /// Cadence of recurring checks
    interval: Duration,
    /// Maximum lifetime of one monitoring session
    max_polling_time: Duration,
    max_consecutive_errors: u32,
    max_total_errors: u32,
    backoff_factor: f64,
    max_backoff: Duration,
    backoff_policy: BackoffPolicy,
}

impl PollingConfig {
    /// Create a new polling configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status endpoint base URL. Trailing slashes are removed.
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the interval between recurring checks. Default: 3 seconds.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the maximum monitoring time per file. Default: 5 minutes.
    pub fn with_max_polling_time(mut self, max: Duration) -> Self {
        self.max_polling_time = max;
        self
    }

    pub fn with_max_consecutive_errors(mut self, max: u32) -> Self {
        self.max_consecutive_errors = max;
        self
    }

    pub fn with_max_total_errors(mut self, max: u32) -> Self {
        self.max_total_errors = max;
        self
    }

    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    pub fn with_max_backoff(mut self, max: Duration) -> Self {
        self.max_backoff = max;
        self
    }

    pub fn with_backoff_policy(mut self, policy: BackoffPolicy) -> Self {
        self.backoff_policy = policy;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_polling_time(&self) -> Duration {
        self.max_polling_time
    }

    pub fn max_consecutive_errors(&self) -> u32 {
        self.max_consecutive_errors
    }

    pub fn max_total_errors(&self) -> u32 {
        self.max_total_errors
    }

    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    pub fn max_backoff(&self) -> Duration {
        self.max_backoff
    }

    pub fn backoff_policy(&self) -> BackoffPolicy {
        self.backoff_policy
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_polling_time: Duration::from_secs(DEFAULT_MAX_POLLING_TIME_SECS),
            max_consecutive_errors: DEFAULT_MAX_CONSECUTIVE_ERRORS,
            max_total_errors: DEFAULT_MAX_TOTAL_ERRORS,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_backoff: Duration::from_millis(DEFAULT_MAX_BACKOFF_MS),
            backoff_policy: DEFAULT_BACKOFF_POLICY,
        }
    }
}
