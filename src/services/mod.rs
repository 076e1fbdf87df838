//! Service layer for monday-export
//!
//! Business logic between the Monday.com client and the output sinks.

pub mod normalizer;

pub use normalizer::{NormalizeStats, NormalizedTable, Normalizer, RowDecision, SeenHeaders};
