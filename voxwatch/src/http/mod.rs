//! HTTP access for the status and result endpoints.
//!
//! Components never talk to `reqwest` directly. They depend on the
//! [`AsyncHttpClient`] trait so tests can substitute scripted clients.

mod client;
mod error;

pub use client::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_REQUEST_TIMEOUT};
pub use error::HttpError;

#[cfg(test)]
pub(crate) use client::tests;
