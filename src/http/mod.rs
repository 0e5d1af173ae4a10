//! HTTP client functionality.
//!
//! - [`client`] - client creation with tracing and retry middleware

pub mod client;

pub use client::{create_http_client, HttpClientConfig, DEFAULT_USER_AGENT};
