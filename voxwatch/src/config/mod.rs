//! Configuration for voxwatch components.
//!
//! Two layers live here:
//!
//! - [`ConfigFile`]: the user's `~/.voxwatch/config.ini`, one settings struct
//!   per INI section, with [`ConfigKey`] for `section.key` access.
//! - Typed component configs ([`PollingConfig`], [`StageConfig`],
//!   [`UploadConfig`]) built from the file or directly with builder methods.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use voxwatch::config::{ConfigFile, PollingConfig};
//!
//! let file = ConfigFile::default();
//! let polling: PollingConfig = file.polling_config();
//! assert_eq!(polling.interval(), Duration::from_millis(3000));
//! ```

mod defaults;
mod file;
mod keys;
mod parser;
mod polling;
mod settings;
mod stages;
mod upload;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use polling::{BackoffPolicy, PollingConfig};
pub use settings::{
    ConfigFile, LoggingSettings, PollingSettings, StagesSettings, StatusSettings, UploadSettings,
};
pub use stages::StageConfig;
pub use upload::UploadConfig;
