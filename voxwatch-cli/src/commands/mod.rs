//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`check`] - One status query
//! - [`config`] - Configuration management (get, set, list, path, init)
//! - [`fetch`] - Download a result document
//! - [`watch`] - Monitor a file until processing ends

pub mod check;
pub mod config;
pub mod fetch;
pub mod watch;
