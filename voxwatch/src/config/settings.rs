//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use super::polling::{BackoffPolicy, PollingConfig};
use super::stages::StageConfig;
use super::upload::UploadConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Status endpoint settings
    pub status: StatusSettings,
    /// Polling cadence and error limits
    pub polling: PollingSettings,
    /// Stage tracker timing
    pub stages: StagesSettings,
    /// Upload integration settings
    pub upload: UploadSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Status endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSettings {
    /// Base URL; the file key is appended as `{api_url}/{file_key}`
    pub api_url: String,
    /// Timeout in seconds for HTTP requests
    pub request_timeout_secs: u64,
}

/// Polling configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PollingSettings {
    pub interval_ms: u64,
    pub max_time_secs: u64,
    pub max_consecutive_errors: u32,
    pub max_total_errors: u32,
    pub backoff_factor: f64,
    pub max_backoff_ms: u64,
    pub backoff_policy: BackoffPolicy,
}

/// Stage tracker configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagesSettings {
    pub tick_interval_ms: u64,
    pub unlock_delay_ms: u64,
}

/// Upload integration configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    /// Delay between upload success and monitoring start
    pub monitor_delay_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

impl ConfigFile {
    /// Builds the poller configuration from the `[status]` and `[polling]` sections.
    pub fn polling_config(&self) -> PollingConfig {
        PollingConfig::new()
            .with_api_url(&self.status.api_url)
            .with_request_timeout(Duration::from_secs(self.status.request_timeout_secs))
            .with_interval(Duration::from_millis(self.polling.interval_ms))
            .with_max_polling_time(Duration::from_secs(self.polling.max_time_secs))
            .with_max_consecutive_errors(self.polling.max_consecutive_errors)
            .with_max_total_errors(self.polling.max_total_errors)
            .with_backoff_factor(self.polling.backoff_factor)
            .with_max_backoff(Duration::from_millis(self.polling.max_backoff_ms))
            .with_backoff_policy(self.polling.backoff_policy)
    }

    /// Builds the stage tracker configuration from the `[stages]` section.
    pub fn stage_config(&self) -> StageConfig {
        StageConfig::new()
            .with_tick_interval(Duration::from_millis(self.stages.tick_interval_ms))
            .with_unlock_delay(Duration::from_millis(self.stages.unlock_delay_ms))
    }

    /// Builds the upload integration configuration from the `[upload]` section.
    pub fn upload_config(&self) -> UploadConfig {
        UploadConfig::new().with_monitor_delay(Duration::from_millis(self.upload.monitor_delay_ms))
    }
}
