//! Configuration key access and validation.
//!
//! This module provides a type-safe interface for getting and setting
//! configuration values by key name, with validation via the Specification Pattern.

use std::str::FromStr;
use thiserror::Error;

use super::parser::expand_tilde;
use super::polling::BackoffPolicy;
use super::settings::ConfigFile;
use super::writer::path_to_string;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
///
/// Each key maps to a specific field in [`ConfigFile`] and knows how to
/// get and set its value with proper validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    // Status endpoint settings
    StatusApiUrl,
    StatusRequestTimeoutSecs,

    // Polling settings
    PollingIntervalMs,
    PollingMaxTimeSecs,
    PollingMaxConsecutiveErrors,
    PollingMaxTotalErrors,
    PollingBackoffFactor,
    PollingMaxBackoffMs,
    PollingBackoffPolicy,

    // Stage settings
    StagesTickIntervalMs,
    StagesUnlockDelayMs,

    // Upload settings
    UploadMonitorDelayMs,

    // Logging settings
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|key| key.name() == lower)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Get the canonical key name (e.g., "polling.interval_ms").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::StatusApiUrl => "status.api_url",
            ConfigKey::StatusRequestTimeoutSecs => "status.request_timeout_secs",
            ConfigKey::PollingIntervalMs => "polling.interval_ms",
            ConfigKey::PollingMaxTimeSecs => "polling.max_time_secs",
            ConfigKey::PollingMaxConsecutiveErrors => "polling.max_consecutive_errors",
            ConfigKey::PollingMaxTotalErrors => "polling.max_total_errors",
            ConfigKey::PollingBackoffFactor => "polling.backoff_factor",
            ConfigKey::PollingMaxBackoffMs => "polling.max_backoff_ms",
            ConfigKey::PollingBackoffPolicy => "polling.backoff_policy",
            ConfigKey::StagesTickIntervalMs => "stages.tick_interval_ms",
            ConfigKey::StagesUnlockDelayMs => "stages.unlock_delay_ms",
            ConfigKey::UploadMonitorDelayMs => "upload.monitor_delay_ms",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Get the section name (e.g., "polling").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "interval_ms").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::StatusApiUrl => config.status.api_url.clone(),
            ConfigKey::StatusRequestTimeoutSecs => config.status.request_timeout_secs.to_string(),
            ConfigKey::PollingIntervalMs => config.polling.interval_ms.to_string(),
            ConfigKey::PollingMaxTimeSecs => config.polling.max_time_secs.to_string(),
            ConfigKey::PollingMaxConsecutiveErrors => {
                config.polling.max_consecutive_errors.to_string()
            }
            ConfigKey::PollingMaxTotalErrors => config.polling.max_total_errors.to_string(),
            ConfigKey::PollingBackoffFactor => config.polling.backoff_factor.to_string(),
            ConfigKey::PollingMaxBackoffMs => config.polling.max_backoff_ms.to_string(),
            ConfigKey::PollingBackoffPolicy => config.polling.backoff_policy.to_string(),
            ConfigKey::StagesTickIntervalMs => config.stages.tick_interval_ms.to_string(),
            ConfigKey::StagesUnlockDelayMs => config.stages.unlock_delay_ms.to_string(),
            ConfigKey::UploadMonitorDelayMs => config.upload.monitor_delay_ms.to_string(),
            ConfigKey::LoggingFile => path_to_string(&config.logging.file),
        }
    }

    /// Set the value in a config file.
    ///
    /// Validates the value according to the key's specification before setting.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        self.validate(value)?;
        self.apply(config, value.trim())
    }

    /// Writes an already validated value. Parse failures are still reported
    /// rather than assumed impossible.
    fn apply(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        match self {
            ConfigKey::StatusApiUrl => {
                config.status.api_url = value.trim_end_matches('/').to_string();
            }
            ConfigKey::StatusRequestTimeoutSecs => {
                config.status.request_timeout_secs = self.parse(value)?;
            }
            ConfigKey::PollingIntervalMs => config.polling.interval_ms = self.parse(value)?,
            ConfigKey::PollingMaxTimeSecs => config.polling.max_time_secs = self.parse(value)?,
            ConfigKey::PollingMaxConsecutiveErrors => {
                config.polling.max_consecutive_errors = self.parse(value)?;
            }
            ConfigKey::PollingMaxTotalErrors => {
                config.polling.max_total_errors = self.parse(value)?;
            }
            ConfigKey::PollingBackoffFactor => config.polling.backoff_factor = self.parse(value)?,
            ConfigKey::PollingMaxBackoffMs => config.polling.max_backoff_ms = self.parse(value)?,
            ConfigKey::PollingBackoffPolicy => {
                config.polling.backoff_policy = self.parse::<BackoffPolicy>(value)?;
            }
            ConfigKey::StagesTickIntervalMs => {
                config.stages.tick_interval_ms = self.parse(value)?;
            }
            ConfigKey::StagesUnlockDelayMs => config.stages.unlock_delay_ms = self.parse(value)?,
            ConfigKey::UploadMonitorDelayMs => {
                config.upload.monitor_delay_ms = self.parse(value)?;
            }
            ConfigKey::LoggingFile => config.logging.file = expand_tilde(value),
        }
        Ok(())
    }

    fn parse<T: FromStr>(&self, value: &str) -> Result<T, ConfigKeyError> {
        value.parse().map_err(|_| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: format!("cannot parse '{}'", value),
        })
    }

    /// Validate a value according to this key's specification.
    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        self.specification()
            .is_satisfied_by(value.trim())
            .map_err(|reason| ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason,
            })
    }

    /// Get the validation specification for this key.
    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            ConfigKey::StatusApiUrl => Box::new(UrlSpec),
            ConfigKey::StatusRequestTimeoutSecs => Box::new(PositiveIntegerSpec),
            ConfigKey::PollingIntervalMs => Box::new(PositiveIntegerSpec),
            ConfigKey::PollingMaxTimeSecs => Box::new(PositiveIntegerSpec),
            ConfigKey::PollingMaxConsecutiveErrors => Box::new(PositiveIntegerSpec),
            ConfigKey::PollingMaxTotalErrors => Box::new(PositiveIntegerSpec),
            ConfigKey::PollingBackoffFactor => Box::new(FactorSpec),
            ConfigKey::PollingMaxBackoffMs => Box::new(PositiveIntegerSpec),
            ConfigKey::PollingBackoffPolicy => {
                Box::new(OneOfSpec::new(&["advisory", "reschedule"]))
            }
            ConfigKey::StagesTickIntervalMs => Box::new(PositiveIntegerSpec),
            ConfigKey::StagesUnlockDelayMs => Box::new(NonNegativeIntegerSpec),
            ConfigKey::UploadMonitorDelayMs => Box::new(NonNegativeIntegerSpec),
            ConfigKey::LoggingFile => Box::new(PathSpec),
        }
    }

    /// Get all supported configuration keys.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::StatusApiUrl,
            ConfigKey::StatusRequestTimeoutSecs,
            ConfigKey::PollingIntervalMs,
            ConfigKey::PollingMaxTimeSecs,
            ConfigKey::PollingMaxConsecutiveErrors,
            ConfigKey::PollingMaxTotalErrors,
            ConfigKey::PollingBackoffFactor,
            ConfigKey::PollingMaxBackoffMs,
            ConfigKey::PollingBackoffPolicy,
            ConfigKey::StagesTickIntervalMs,
            ConfigKey::StagesUnlockDelayMs,
            ConfigKey::UploadMonitorDelayMs,
            ConfigKey::LoggingFile,
        ]
    }
}

// ============================================================================
// Value Specifications (Specification Pattern)
// ============================================================================

/// Trait for value validation specifications.
trait ValueSpecification {
    /// Check if the value satisfies this specification.
    /// Returns Ok(()) if valid, Err(reason) if invalid.
    fn is_satisfied_by(&self, value: &str) -> Result<(), String>;
}

/// Specification that requires the value to be one of a set of options.
struct OneOfSpec {
    options: &'static [&'static str],
}

impl OneOfSpec {
    fn new(options: &'static [&'static str]) -> Self {
        Self { options }
    }
}

impl ValueSpecification for OneOfSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        let lower = value.to_lowercase();
        if self.options.iter().any(|opt| *opt == lower) {
            Ok(())
        } else {
            Err(format!("must be one of: {}", self.options.join(", ")))
        }
    }
}

/// Specification for integers greater than zero.
struct PositiveIntegerSpec;

impl ValueSpecification for PositiveIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<u32>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err("must be a positive integer".to_string()),
        }
    }
}

/// Specification for integers that may be zero.
struct NonNegativeIntegerSpec;

impl ValueSpecification for NonNegativeIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        value
            .parse::<u64>()
            .map(|_| ())
            .map_err(|_| "must be a non-negative integer".to_string())
    }
}

/// Specification for the backoff growth factor.
struct FactorSpec;

impl ValueSpecification for FactorSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<f64>() {
            Ok(n) if n >= 1.0 && n.is_finite() => Ok(()),
            _ => Err("must be a number >= 1.0".to_string()),
        }
    }
}

/// Specification for http(s) URLs.
struct UrlSpec;

impl ValueSpecification for UrlSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(())
        } else {
            Err("must be a URL starting with 'http://' or 'https://'".to_string())
        }
    }
}

/// Specification for path values (non-empty).
struct PathSpec;

impl ValueSpecification for PathSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err("must be a valid path".to_string())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_keys() {
        assert_eq!(
            "polling.interval_ms".parse::<ConfigKey>().unwrap(),
            ConfigKey::PollingIntervalMs
        );
        assert_eq!(
            "STATUS.API_URL".parse::<ConfigKey>().unwrap(),
            ConfigKey::StatusApiUrl
        );
    }

    #[test]
    fn test_unknown_key() {
        let err = "polling.jitter".parse::<ConfigKey>().unwrap_err();
        assert!(matches!(err, ConfigKeyError::UnknownKey(_)));
    }

    #[test]
    fn test_every_key_round_trips_its_name() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
            assert_eq!(
                format!("{}.{}", key.section(), key.key_name()),
                key.name()
            );
        }
    }

    #[test]
    fn test_every_default_value_validates() {
        let config = ConfigFile::default();
        for key in ConfigKey::all() {
            let value = key.get(&config);
            assert!(key.validate(&value).is_ok(), "{} = {}", key.name(), value);
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut config = ConfigFile::default();

        ConfigKey::PollingIntervalMs.set(&mut config, "1500").unwrap();
        ConfigKey::PollingBackoffPolicy.set(&mut config, "Reschedule").unwrap();
        ConfigKey::StatusApiUrl
            .set(&mut config, "https://api.example.com/status/")
            .unwrap();

        assert_eq!(ConfigKey::PollingIntervalMs.get(&config), "1500");
        assert_eq!(ConfigKey::PollingBackoffPolicy.get(&config), "reschedule");
        assert_eq!(
            ConfigKey::StatusApiUrl.get(&config),
            "https://api.example.com/status"
        );
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = ConfigFile::default();

        assert!(ConfigKey::PollingIntervalMs.set(&mut config, "0").is_err());
        assert!(ConfigKey::PollingIntervalMs.set(&mut config, "-3").is_err());
        assert!(ConfigKey::PollingBackoffFactor.set(&mut config, "0.9").is_err());
        assert!(ConfigKey::StatusApiUrl.set(&mut config, "localhost").is_err());
        assert!(ConfigKey::LoggingFile.set(&mut config, "  ").is_err());

        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_zero_delays_allowed() {
        let mut config = ConfigFile::default();
        ConfigKey::StagesUnlockDelayMs.set(&mut config, "0").unwrap();
        ConfigKey::UploadMonitorDelayMs.set(&mut config, "0").unwrap();
        assert_eq!(config.stages.unlock_delay_ms, 0);
        assert_eq!(config.upload.monitor_delay_ms, 0);
    }
}
