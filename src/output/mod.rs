//! Output module
//!
//! Turns loaded items into something a presentation layer can show.
//!
//! # Overview
//!
//! This module provides:
//! - A column/row table derived from the first item's field order
//! - Humanized column headers
//! - A [`LoadView`] describing which actions should be offered
//! - Plain-text and JSON renderings for the command line

mod table;
mod view;

pub use table::{display_value, humanize_header, render_json, Table};
pub use view::LoadView;
