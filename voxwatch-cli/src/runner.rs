//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, runtime creation and
//! file output so command handlers stay short.

use crate::error::CliError;
use std::future::Future;
use std::path::Path;
use tokio::runtime::Runtime;
use tracing::info;
use voxwatch::config::{ConfigFile, PollingConfig, DEFAULT_LOG_FILE_NAME};
use voxwatch::http::AsyncReqwestClient;
use voxwatch::logging::{init_logging_full, LoggingGuard};
use voxwatch::results::ProcessingResult;

/// Command-line overrides for the polling configuration.
#[derive(Debug, Clone, Default)]
pub struct PollingOverrides {
    pub api_url: Option<String>,
    pub interval_ms: Option<u64>,
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps file logging active while the runner exists
    _logging_guard: LoggingGuard,
    config: ConfigFile,
    runtime: Runtime,
}

impl CliRunner {
    /// Loads the config, starts logging and builds the runtime.
    ///
    /// Log output goes to the configured file. Stdout logging is only enabled
    /// in debug mode so it does not interleave with the progress display.
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string());

        let logging_guard = init_logging_full(log_dir, &log_file, debug_mode, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
            runtime,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!("voxwatch v{}", voxwatch::VERSION);
        info!("voxwatch CLI: {} command", command);
    }

    /// Polling config from the file with command-line overrides applied.
    pub fn polling_config(&self, overrides: &PollingOverrides) -> PollingConfig {
        resolve_polling_config(&self.config, overrides)
    }

    pub fn http_client(&self, polling: &PollingConfig) -> Result<AsyncReqwestClient, CliError> {
        AsyncReqwestClient::with_timeout(polling.request_timeout()).map_err(CliError::HttpClient)
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Writes the result document as pretty JSON.
    pub fn save_result(&self, path: &Path, result: &ProcessingResult) -> Result<(), CliError> {
        let json = result
            .to_pretty_json()
            .map_err(|e| CliError::ProcessingFailed(e.to_string()))?;

        std::fs::write(path, json).map_err(|error| CliError::FileWrite {
            path: path.display().to_string(),
            error,
        })?;

        info!(path = %path.display(), "Result saved");
        Ok(())
    }
}

fn resolve_polling_config(config: &ConfigFile, overrides: &PollingOverrides) -> PollingConfig {
    let mut polling = config.polling_config();
    if let Some(url) = &overrides.api_url {
        polling = polling.with_api_url(url);
    }
    if let Some(ms) = overrides.interval_ms {
        polling = polling.with_interval(std::time::Duration::from_millis(ms));
    }
    polling
}
