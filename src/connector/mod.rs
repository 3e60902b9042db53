//! Integration connector module
//!
//! Manages the OAuth connect/disconnect lifecycle of a single integration.
//!
//! # Overview
//!
//! Connecting is an out-of-band flow: the backend hands out an
//! authorization URL, the user completes consent on an
//! [`AuthorizationSurface`], and the connector polls that surface until it
//! closes. The first poll that observes closure performs exactly one
//! credential exchange. Results reach the parent through a
//! [`CredentialsUpdate`] callback.

mod integration;
mod surface;

pub use integration::{
    CredentialsUpdate, IntegrationConnector, PollOutcome, UpdateCallback, DEFAULT_POLL_INTERVAL,
};
pub use surface::{AuthorizationSurface, ConsoleSurface, FlagHandle, SurfaceHandle};
