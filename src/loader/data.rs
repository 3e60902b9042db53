//! Paginated data loader
//!
//! Fetches an integration's items one page at a time, following the
//! backend's opaque cursor, and accumulates them for display.

use super::state::{LoadPhase, LoadState};
use crate::api::{IntegrationApi, Page, PageRequest};
use crate::error::{Error, Result};
use crate::notify::{LogNotifier, Notifier};
use crate::output::LoadView;
use crate::types::{IntegrationCredentials, IntegrationKind, LoadedItem};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Items requested per page unless configured otherwise
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Message shown when a fetch fails without a backend detail
const LOAD_FALLBACK_MESSAGE: &str = "Error loading data";

/// Cursor-paginated loader for one integration
pub struct PaginatedDataLoader {
    kind: IntegrationKind,
    api: Arc<dyn IntegrationApi>,
    notifier: Arc<dyn Notifier>,
    page_limit: u32,
    state: LoadState,
}

impl PaginatedDataLoader {
    /// Create an empty loader
    pub fn new(kind: IntegrationKind, api: Arc<dyn IntegrationApi>) -> Self {
        Self {
            kind,
            api,
            notifier: Arc::new(LogNotifier),
            page_limit: DEFAULT_PAGE_LIMIT,
            state: LoadState::new(),
        }
    }

    /// Route user-facing alerts to `notifier`
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Set the number of items requested per page
    #[must_use]
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit;
        self
    }

    pub fn kind(&self) -> IntegrationKind {
        self.kind
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn items(&self) -> &[LoadedItem] {
        self.state.items()
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn phase(&self) -> LoadPhase {
        self.state.phase()
    }

    /// Presentation of the current state
    pub fn view(&self) -> LoadView {
        LoadView::from_state(&self.state)
    }

    /// Fetch the next page and append its items.
    ///
    /// Rejected without a network call when credentials are missing, the
    /// data is exhausted, or a load is already in flight.
    pub async fn load(&mut self, credentials: Option<&IntegrationCredentials>) -> Result<usize> {
        let request = self.prepare_request(credentials)?;
        let response = self.api.fetch_page(self.kind, &request).await;
        self.apply_response(response)
    }

    /// Keep loading until the data is exhausted or `max_pages` pages were
    /// fetched by this call. Returns the number of items added.
    pub async fn load_all(
        &mut self,
        credentials: Option<&IntegrationCredentials>,
        max_pages: Option<usize>,
    ) -> Result<usize> {
        let mut added = 0;
        let mut pages = 0;
        loop {
            added += self.load(credentials).await?;
            pages += 1;
            if !self.state.has_more() || max_pages.is_some_and(|max| pages >= max) {
                return Ok(added);
            }
        }
    }

    /// Check preconditions and enter `Loading`.
    ///
    /// The returned request must be answered with
    /// [`apply_response`](Self::apply_response).
    pub fn prepare_request(
        &mut self,
        credentials: Option<&IntegrationCredentials>,
    ) -> Result<PageRequest> {
        let Some(credentials) = credentials.filter(|c| !c.is_empty()) else {
            return Err(self.report(Error::MissingCredentials));
        };

        let after = match self.state.begin() {
            Ok(after) => after,
            Err(err) => return Err(self.report(err)),
        };

        debug!(
            integration = %self.kind,
            limit = self.page_limit,
            after = after.as_deref().unwrap_or("<start>"),
            "requesting page"
        );

        Ok(PageRequest {
            credentials: credentials.clone(),
            limit: self.page_limit,
            after,
        })
    }

    /// Leave `Loading` with the outcome of a prepared request
    pub fn apply_response(&mut self, response: Result<Page>) -> Result<usize> {
        if !self.state.is_loading() {
            debug!(integration = %self.kind, "discarding page with no request in flight");
            return Err(Error::invalid_state("apply a page", "no request is in flight"));
        }

        match response {
            Ok(page) => {
                let added = self.state.complete(page);
                info!(
                    integration = %self.kind,
                    added,
                    total = self.state.items().len(),
                    has_more = self.state.has_more(),
                    "page loaded"
                );
                Ok(added)
            }
            Err(err) => {
                self.state.fail();
                Err(self.report(err))
            }
        }
    }

    /// Drop everything loaded so far and start over from the first page
    pub fn clear(&mut self) {
        debug!(integration = %self.kind, "clearing loaded data");
        self.state.reset();
    }

    fn report(&self, err: Error) -> Error {
        let message = err.user_message(Some(LOAD_FALLBACK_MESSAGE));
        warn!(integration = %self.kind, error = %err, "load failed");
        self.notifier.alert(&message);
        err
    }
}

impl std::fmt::Debug for PaginatedDataLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedDataLoader")
            .field("kind", &self.kind)
            .field("page_limit", &self.page_limit)
            .field("items", &self.state.items().len())
            .field("cursor", &self.state.cursor())
            .field("phase", &self.state.phase())
            .finish_non_exhaustive()
    }
}
