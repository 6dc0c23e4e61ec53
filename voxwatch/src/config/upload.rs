//! Upload integration configuration.

use super::defaults::DEFAULT_MONITOR_DELAY_MS;
use std::time::Duration;

/// Configuration for [`UploadIntegrator`](crate::upload::UploadIntegrator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadConfig {
    monitor_delay: Duration,
}

impl UploadConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delay between upload success and monitoring start. Default: 2 seconds.
    pub fn with_monitor_delay(mut self, delay: Duration) -> Self {
        self.monitor_delay = delay;
        self
    }

    pub fn monitor_delay(&self) -> Duration {
        self.monitor_delay
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            monitor_delay: Duration::from_millis(DEFAULT_MONITOR_DELAY_MS),
        }
    }
}
