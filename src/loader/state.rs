//! Load state bookkeeping
//!
//! Pure state machine behind [`PaginatedDataLoader`](super::PaginatedDataLoader):
//!
//! ```text
//! Idle --begin--> Loading --complete/fail--> Idle
//!                                  |
//!                                  +--(no next cursor)--> Exhausted --reset--> Idle
//! ```

use crate::api::Page;
use crate::error::{Error, Result};
use crate::types::{LoadedItem, OptionStringExt, PageCursor};
use serde::Serialize;

/// Coarse phase derived from [`LoadState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    Idle,
    Loading,
    Exhausted,
}

/// Accumulated items plus pagination position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadState {
    items: Vec<LoadedItem>,
    cursor: Option<PageCursor>,
    has_more: bool,
    is_loading: bool,
    pages_loaded: usize,
}

impl Default for LoadState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
            has_more: true,
            is_loading: false,
            pages_loaded: 0,
        }
    }
}

impl LoadState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LoadedItem] {
        &self.items
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Successful fetches since the last reset
    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    pub fn phase(&self) -> LoadPhase {
        if self.is_loading {
            LoadPhase::Loading
        } else if !self.has_more {
            LoadPhase::Exhausted
        } else {
            LoadPhase::Idle
        }
    }

    /// Enter `Loading` and return the cursor to resume from
    pub fn begin(&mut self) -> Result<Option<PageCursor>> {
        if !self.has_more {
            return Err(Error::NoMoreData);
        }
        if self.is_loading {
            return Err(Error::LoadInProgress);
        }
        self.is_loading = true;
        Ok(self.cursor.clone())
    }

    /// Append a fetched page and move the cursor. Returns the number of new items.
    pub fn complete(&mut self, page: Page) -> usize {
        let added = page.items.len();
        self.items.extend(page.items);
        self.cursor = page.next_cursor.none_if_empty();
        self.has_more = self.cursor.is_some();
        self.is_loading = false;
        self.pages_loaded += 1;
        added
    }

    /// Leave `Loading` after a failed fetch; items and cursor are untouched
    pub fn fail(&mut self) {
        self.is_loading = false;
    }

    /// Back to an empty, loadable state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
