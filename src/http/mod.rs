//! HTTP client module
//!
//! Talks to the integrations backend: form-encoded POSTs, structured
//! error extraction and decoding of the authorize/credentials/items
//! responses.
//!
//! # Endpoints
//!
//! - `POST /integrations/{integration}/authorize`
//! - `POST /integrations/{integration}/credentials`
//! - `POST /integrations/{integration}/disconnect`
//! - `POST /integrations/{integration}/get_{integration}_items`

mod client;
mod endpoints;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use endpoints::Endpoint;

#[cfg(test)]
mod tests;
