//! Backend API abstraction
//!
//! The connector and loader talk to the integrations backend only through
//! [`IntegrationApi`], so they can run against the HTTP client or an
//! in-process fake.

use crate::error::Result;
use crate::types::{Identity, IntegrationCredentials, IntegrationKind, LoadedItem, PageCursor};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Parameters of one page fetch
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub credentials: IntegrationCredentials,
    pub limit: u32,
    /// Cursor from the previous page; `None` starts from the beginning
    pub after: Option<PageCursor>,
}

/// One page of items as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub items: Vec<LoadedItem>,
    #[serde(default)]
    pub next_cursor: Option<PageCursor>,
}

/// Operations exposed by the integrations backend
#[async_trait]
pub trait IntegrationApi: Send + Sync {
    /// Start OAuth; returns the URL the user must visit
    async fn authorize(&self, kind: IntegrationKind, identity: &Identity) -> Result<String>;

    /// Fetch credentials stored by the OAuth callback. `None` when the
    /// backend answered with an empty payload.
    async fn fetch_credentials(
        &self,
        kind: IntegrationKind,
        identity: &Identity,
    ) -> Result<Option<IntegrationCredentials>>;

    /// Drop stored credentials on the backend
    async fn disconnect(&self, kind: IntegrationKind, identity: &Identity) -> Result<()>;

    /// Fetch one page of items
    async fn fetch_page(&self, kind: IntegrationKind, request: &PageRequest) -> Result<Page>;
}
