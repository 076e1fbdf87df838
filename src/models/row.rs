//! Row model
//!
//! Flat, sink-agnostic rows produced from board items.

use std::collections::HashSet;

use super::board::Item;

/// Second header cell
pub const ITEM_NAME_HEADER: &str = "Item Name";

/// `[item id, item name, column text...]`
pub type NormalizedRow = Vec<String>;

/// Build the flat row for an item
pub fn item_row(item: &Item) -> NormalizedRow {
    let mut row = Vec::with_capacity(2 + item.column_values.len());
    row.push(item.id.clone());
    row.push(item.name.clone());
    row.extend(
        item.column_values
            .iter()
            .map(|cv| cv.text_or_empty().to_string()),
    );
    row
}

/// The header line written before any data rows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeaderRow {
    cells: Vec<String>,
}

impl HeaderRow {
    /// `[table_header_id, "Item Name", column titles of `item`...]`
    pub fn from_item(table_header_id: &str, item: &Item) -> Self {
        let mut cells = Vec::with_capacity(2 + item.column_values.len());
        cells.push(table_header_id.to_string());
        cells.push(ITEM_NAME_HEADER.to_string());
        cells.extend(item.column_values.iter().map(|cv| cv.column_title.clone()));
        Self { cells }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of board columns (cells after id and name)
    pub fn column_count(&self) -> usize {
        self.cells.len().saturating_sub(2)
    }
}

/// Item IDs to drop silently
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    ids: HashSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
