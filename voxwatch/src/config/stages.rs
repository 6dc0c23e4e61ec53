//! Stage tracker configuration.

use super::defaults::{DEFAULT_TICK_INTERVAL_MS, DEFAULT_UNLOCK_DELAY_MS};
use std::time::Duration;

/// Timing parameters for [`StageTracker`](crate::stages::StageTracker).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageConfig {
    /// Period of the elapsed-time ticker
    tick_interval: Duration,
    /// Delay before the upload trigger is re-enabled after finishing
    unlock_delay: Duration,
}

impl StageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_unlock_delay(mut self, delay: Duration) -> Self {
        self.unlock_delay = delay;
        self
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn unlock_delay(&self) -> Duration {
        self.unlock_delay
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            unlock_delay: Duration::from_millis(DEFAULT_UNLOCK_DELAY_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StageConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.unlock_delay(), Duration::from_secs(3));
    }

    #[test]
    fn test_with_unlock_delay() {
        let config = StageConfig::new().with_unlock_delay(Duration::ZERO);
        assert_eq!(config.unlock_delay(), Duration::ZERO);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }
}
