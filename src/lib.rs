// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # integration-hub
//!
//! Client-side components for connecting third-party data integrations
//! (Notion, Airtable, HubSpot) through an OAuth backend and browsing the
//! items they expose, one cursor-paginated page at a time.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use integration_hub::{
//!     ConsoleSurface, HttpClient, Identity, IntegrationConnector, IntegrationKind,
//!     PaginatedDataLoader, Result,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let api = Arc::new(HttpClient::new()?);
//!     let identity = Identity::new("user-1", "org-1");
//!
//!     let mut connector = IntegrationConnector::new(
//!         IntegrationKind::HubSpot,
//!         identity,
//!         api.clone(),
//!         Arc::new(ConsoleSurface),
//!     );
//!     connector.connect().await?;
//!
//!     let mut loader = PaginatedDataLoader::new(IntegrationKind::HubSpot, api);
//!     loader.load(connector.credentials()).await?;
//!     println!("{} items", loader.items().len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────── parent view ─────────────────────────────┐
//! │  IntegrationParams { type, credentials }  <── CredentialsUpdate ──┐   │
//! │        │                                                          │   │
//! │        ├──> IntegrationConnector (connect / poll / disconnect) ───┘   │
//! │        └──> PaginatedDataLoader  (load / load more / clear)           │
//! └───────────────────────────────────┬───────────────────────────────────┘
//!                                     │ IntegrationApi
//!                          HttpClient (form-encoded POST)
//!                                     │
//!                         /integrations/{segment}/...
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// Backend operations the components depend on
pub mod api;

/// HTTP implementation of the backend operations
pub mod http;

/// User-facing alerts
pub mod notify;

/// OAuth connect/disconnect lifecycle
pub mod connector;

/// Cursor-paginated item loading
pub mod loader;

/// Table and view rendering
pub mod output;

/// Parent-owned params and their persistence
pub mod state;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use api::{IntegrationApi, Page, PageRequest};
pub use config::Config;
pub use connector::{
    AuthorizationSurface, ConsoleSurface, CredentialsUpdate, IntegrationConnector,
    SurfaceHandle,
};
pub use http::HttpClient;
pub use loader::PaginatedDataLoader;
pub use notify::{LogNotifier, Notifier};
pub use state::{IntegrationParams, ParamsStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
