//! Presentation state derived from a loader

use super::table::Table;
use crate::loader::LoadState;
use serde::Serialize;

/// What a presentation layer should show for a [`LoadState`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadView {
    /// Table of loaded items; `None` when nothing has been loaded
    pub table: Option<Table>,
    /// Whether the initial "load" action is available
    pub load_enabled: bool,
    /// Whether a "load more" affordance is shown under the table
    pub show_load_more: bool,
    /// Whether the "clear" action is available
    pub clear_enabled: bool,
    /// Whether a fetch is in flight (progress indicator)
    pub is_loading: bool,
}

impl LoadView {
    pub fn from_state(state: &LoadState) -> Self {
        let has_items = !state.items().is_empty();
        Self {
            table: Table::from_items(state.items()),
            load_enabled: !state.is_loading() && state.has_more(),
            show_load_more: has_items && state.has_more(),
            clear_enabled: has_items,
            is_loading: state.is_loading(),
        }
    }
}
