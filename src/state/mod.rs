//! Parent state module
//!
//! Holds the credentials a parent view owns on behalf of its connectors,
//! and persists them between CLI runs.
//!
//! # Overview
//!
//! The state module provides:
//! - `IntegrationParams` - the selected integration and its credentials
//! - `ParamsStore` - file-based persistence with atomic writes

mod params;
mod store;

pub use params::IntegrationParams;
pub use store::{ParamsStore, DEFAULT_PARAMS_PATH};

#[cfg(test)]
mod store_tests;
