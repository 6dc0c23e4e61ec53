//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use super::file::config_directory;
use super::polling::BackoffPolicy;
use super::settings::*;

// =============================================================================
// Status endpoint defaults
// =============================================================================

/// Default status endpoint. The file key is appended as the final path segment.
pub const DEFAULT_API_URL: &str = "https://status.example.com/v1/status";

/// Default timeout in seconds for status and result requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Polling defaults
// =============================================================================

/// Default interval between status checks (3 seconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;

/// Default maximum time a single file is monitored (5 minutes).
pub const DEFAULT_MAX_POLLING_TIME_SECS: u64 = 300;

/// Consecutive failed checks that stop monitoring.
pub const DEFAULT_MAX_CONSECUTIVE_ERRORS: u32 = 5;

/// Total failed checks that stop monitoring.
pub const DEFAULT_MAX_TOTAL_ERRORS: u32 = 10;

/// Backoff growth per consecutive error.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 1.5;

/// Upper bound for the computed backoff (30 seconds).
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 30_000;

/// Default backoff policy.
pub const DEFAULT_BACKOFF_POLICY: BackoffPolicy = BackoffPolicy::Advisory;

// =============================================================================
// Stage tracker defaults
// =============================================================================

/// Elapsed-time ticker period.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

/// Delay before the upload trigger is re-enabled after processing finishes.
pub const DEFAULT_UNLOCK_DELAY_MS: u64 = 3_000;

// =============================================================================
// Upload integration defaults
// =============================================================================

/// Delay between a successful upload and the start of monitoring, giving the
/// storage trigger time to register the object.
pub const DEFAULT_MONITOR_DELAY_MS: u64 = 2_000;

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "voxwatch.log";

// =============================================================================
// ConfigFile::default()
// =============================================================================

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = config_directory();

        Self {
            status: StatusSettings {
                api_url: DEFAULT_API_URL.to_string(),
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            },
            polling: PollingSettings {
                interval_ms: DEFAULT_POLL_INTERVAL_MS,
                max_time_secs: DEFAULT_MAX_POLLING_TIME_SECS,
                max_consecutive_errors: DEFAULT_MAX_CONSECUTIVE_ERRORS,
                max_total_errors: DEFAULT_MAX_TOTAL_ERRORS,
                backoff_factor: DEFAULT_BACKOFF_FACTOR,
                max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
                backoff_policy: DEFAULT_BACKOFF_POLICY,
            },
            stages: StagesSettings {
                tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
                unlock_delay_ms: DEFAULT_UNLOCK_DELAY_MS,
            },
            upload: UploadSettings {
                monitor_delay_ms: DEFAULT_MONITOR_DELAY_MS,
            },
            logging: LoggingSettings {
                file: config_dir.join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
