//! Core data models for monday-export
//!
//! Board data as fetched from Monday.com, and the flat rows written to sinks.

pub mod board;
pub mod row;

pub use board::{BoardData, BoardSummary, Column, ColumnValue, Item};
pub use row::{item_row, ExclusionSet, HeaderRow, NormalizedRow, ITEM_NAME_HEADER};
