//! Board model
//!
//! Boards, their column definitions, and items as returned by the
//! Monday.com GraphQL API.

use serde::{Deserialize, Serialize};

/// A board attribute definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

/// One cell of an item
///
/// The API nests the owning column's title under `column { title }`; it is
/// flattened into `column_title` on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "WireColumnValue")]
pub struct ColumnValue {
    pub id: String,
    pub column_type: String,
    pub text: Option<String>,
    pub column_title: String,
}

#[derive(Deserialize)]
struct WireColumnValue {
    id: String,
    #[serde(rename = "type")]
    column_type: String,
    #[serde(default)]
    text: Option<String>,
    column: ColumnRef,
}

#[derive(Deserialize)]
struct ColumnRef {
    title: String,
}

impl From<WireColumnValue> for ColumnValue {
    fn from(wire: WireColumnValue) -> Self {
        Self {
            id: wire.id,
            column_type: wire.column_type,
            text: wire.text,
            column_title: wire.column.title,
        }
    }
}

impl ColumnValue {
    /// The display text, with null rendered as an empty cell
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// One board row
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub column_values: Vec<ColumnValue>,
}

/// A board as listed by the discovery query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub id: String,
    pub name: String,
}

/// Everything fetched for one board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardData {
    pub board_id: String,
    pub board_name: String,
    /// Captured from the first page only
    pub columns: Vec<Column>,
    pub items: Vec<Item>,
    /// Set when a continuation page failed and pagination stopped early
    pub truncated: bool,
}

impl BoardData {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
