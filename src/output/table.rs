//! Tabular rendering of loaded items
//!
//! Item schemas vary per integration, so the table shape is taken from
//! the data: columns are the first item's keys, in order.

use crate::error::Result;
use crate::types::{JsonValue, LoadedItem};
use serde::Serialize;
use std::fmt::Write as _;

/// Column headers plus rows of display strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Raw field names, in display order
    pub columns: Vec<String>,
    /// Humanized headers, parallel to `columns`
    pub headers: Vec<String>,
    /// One row per item, values in column order
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from items. `None` when there is nothing to show.
    pub fn from_items(items: &[LoadedItem]) -> Option<Self> {
        let first = items.first()?;
        let columns: Vec<String> = first.keys().cloned().collect();
        let headers = columns.iter().map(|c| humanize_header(c)).collect();
        let rows = items
            .iter()
            .map(|item| {
                columns
                    .iter()
                    .map(|column| item.get(column).map(display_value).unwrap_or_default())
                    .collect()
            })
            .collect();

        Some(Self {
            columns,
            headers,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as left-aligned text columns separated by two spaces
    pub fn render_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        write_row(&mut out, &self.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_row(&mut out, &rule, &widths);
        for row in &self.rows {
            write_row(&mut out, row, &widths);
        }
        out
    }
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

/// `first_name` -> `FIRST NAME`
pub fn humanize_header(key: &str) -> String {
    key.replace('_', " ").to_uppercase()
}

/// Cell text for a JSON value. Strings are unquoted, null is blank.
pub fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Pretty JSON array of the items, field order preserved
pub fn render_json(items: &[LoadedItem]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}
