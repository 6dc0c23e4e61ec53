//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use voxwatch::config::ConfigFileError;
use voxwatch::http::HttpError;
use voxwatch::results::ResultError;
use voxwatch::status::{FileKeyError, StatusError, StopReason};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Failed to build the HTTP client
    HttpClient(HttpError),
    /// Invalid file key argument
    FileKey(FileKeyError),
    /// One-off status query failed
    Status(StatusError),
    /// Result download or parsing failed
    Result(ResultError),
    /// Monitoring ended without a successful result
    MonitoringFailed(StopReason),
    /// Processing finished unsuccessfully
    ProcessingFailed(String),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Status(StatusError::Http(_)) | CliError::HttpClient(_) => {
                eprintln!();
                eprintln!("Check that the status endpoint is reachable:");
                eprintln!("  voxwatch config get status.api_url");
                eprintln!("  voxwatch check <FILE_KEY> --api-url <URL>");
            }
            CliError::MonitoringFailed(StopReason::Timeout) => {
                eprintln!();
                eprintln!("Processing may still be running. Raise the limit with:");
                eprintln!("  voxwatch config set polling.max_time_secs <SECONDS>");
            }
            CliError::Result(ResultError::Http(_)) => {
                eprintln!();
                eprintln!("Download links expire one hour after processing completes.");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }

    /// Exit code for this error: 2 for usage and configuration problems, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::FileKey(_) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::FileKey(e) => write!(f, "Invalid file key: {}", e),
            CliError::Status(e) => write!(f, "Status query failed: {}", e),
            CliError::Result(e) => write!(f, "Failed to retrieve result: {}", e),
            CliError::MonitoringFailed(reason) => {
                write!(f, "Monitoring stopped without a result ({})", reason)
            }
            CliError::ProcessingFailed(msg) => write!(f, "Processing failed: {}", msg),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::HttpClient(e) => Some(e),
            CliError::FileKey(e) => Some(e),
            CliError::Status(e) => Some(e),
            CliError::Result(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<FileKeyError> for CliError {
    fn from(e: FileKeyError) -> Self {
        CliError::FileKey(e)
    }
}

impl From<StatusError> for CliError {
    fn from(e: StatusError) -> Self {
        CliError::Status(e)
    }
}

impl From<ResultError> for CliError {
    fn from(e: ResultError) -> Self {
        CliError::Result(e)
    }
}
