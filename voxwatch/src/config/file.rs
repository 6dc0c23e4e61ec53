//! Reading and writing `~/.voxwatch/config.ini`.
//!
//! A missing file is not an error: monitoring runs on the built-in polling
//! limits until `voxwatch config init` or `config set` writes one.

use super::settings::ConfigFile;
use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    #[error("Failed to write config file {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A value that parses but is outside what the poller accepts.
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Falls back to defaults when `path` does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        super::parser::parse_ini(&Ini::load_from_file(path)?)
    }

    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Writes the commented INI, creating `~/.voxwatch` on first use.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        let write_error = |source| ConfigFileError::WriteError {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(write_error)?;
        }
        std::fs::write(path, super::writer::to_config_string(self)).map_err(write_error)
    }
}

/// `~/.voxwatch`, or `./.voxwatch` when no home directory is known. Also the
/// default location of the session log.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".voxwatch")
}

pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackoffPolicy, DEFAULT_POLL_INTERVAL_MS};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.polling.interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.polling.max_consecutive_errors, 5);
        assert_eq!(config.polling.max_total_errors, 10);
        assert_eq!(config.polling.backoff_policy, BackoffPolicy::Advisory);
        assert_eq!(config.upload.monitor_delay_ms, 2_000);
        assert!(config.logging.file.ends_with("voxwatch.log"));
    }

    #[test]
    fn test_missing_file_returns_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.status.api_url = "http://localhost:8080/status".to_string();
        config.polling.interval_ms = 1_500;
        config.polling.backoff_policy = BackoffPolicy::Reschedule;
        config.stages.unlock_delay_ms = 0;

        config.save_to(&path).unwrap();
        let loaded = ConfigFile::load_from(&path).unwrap();

        assert_eq!(loaded.status.api_url, "http://localhost:8080/status");
        assert_eq!(loaded.polling.interval_ms, 1_500);
        assert_eq!(loaded.polling.backoff_policy, BackoffPolicy::Reschedule);
        assert_eq!(loaded.stages.unlock_delay_ms, 0);
    }

    #[test]
    fn test_saved_file_is_commented() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        ConfigFile::default().save_to(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();

        assert!(content.contains("[polling]"));
        assert!(content.contains("; "));
    }

    #[test]
    fn test_save_into_unwritable_location_reports_path() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("config.ini");

        let err = ConfigFile::default().save_to(&path).unwrap_err();

        assert!(matches!(err, ConfigFileError::WriteError { .. }));
        assert!(err.to_string().contains("not-a-dir"));
    }

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with(".voxwatch/config.ini"));
    }
}
