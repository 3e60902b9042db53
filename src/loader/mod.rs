//! Data loader module
//!
//! Page-by-page loading of integration items.
//!
//! # Overview
//!
//! The backend returns `{items, next_cursor}` per page. The loader passes
//! the cursor back verbatim, appends items in response order, and stops
//! offering more once the cursor runs out. [`PaginatedDataLoader::clear`]
//! starts over from the beginning.

mod data;
mod state;

pub use data::{PaginatedDataLoader, DEFAULT_PAGE_LIMIT};
pub use state::{LoadPhase, LoadState};
