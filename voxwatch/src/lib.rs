//! voxwatch - Status monitoring for an audio transcription pipeline
//!
//! After an audio file has been uploaded to object storage, a remote pipeline
//! transcribes and analyzes it asynchronously. This library polls the pipeline's
//! status endpoint until the work finishes, drives a five-stage progress model
//! from the reported phases, and retrieves the final result.
//!
//! # High-Level API
//!
//! For most use cases, [`context::MonitorContext`] wires everything together:
//!
//! ```ignore
//! use std::sync::Arc;
//! use voxwatch::config::ConfigFile;
//! use voxwatch::context::MonitorContext;
//! use voxwatch::http::AsyncReqwestClient;
//!
//! let config = ConfigFile::load()?;
//! let client = AsyncReqwestClient::with_timeout(config.polling_config().request_timeout())?;
//! let context = MonitorContext::builder(client, &config).build();
//!
//! context.tracker().start_processing();
//! context.poller().start_monitoring("uploads/interview.wav").await;
//! ```

pub mod config;
pub mod context;
pub mod events;
pub mod http;
pub mod logging;
pub mod results;
pub mod stages;
pub mod status;
pub mod upload;

/// Version of the voxwatch library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
