//! Row normalization
//!
//! Turns fetched board items into a header plus flat rows, dropping
//! excluded items and header-shaped rows that the API returns as data.
//!
//! Each item row is checked in a fixed order, and the first matching rule
//! decides its fate:
//!
//! 1. equal to a header-shaped row already seen (the real header included): dropped
//! 2. first cell listed in the exclusion set: dropped
//! 3. first cell equal to `table_header_id`: dropped and remembered as a header
//! 4. otherwise: emitted

use std::collections::HashSet;

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{ExportError, ExportResult};
use crate::models::{item_row, ExclusionSet, HeaderRow, Item, NormalizedRow};

/// Header-shaped rows encountered so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenHeaders {
    rows: HashSet<NormalizedRow>,
}

impl SeenHeaders {
    /// Start with the literal header row
    pub fn seeded(header: &HeaderRow) -> Self {
        let mut rows = HashSet::new();
        rows.insert(header.cells().to_vec());
        Self { rows }
    }

    pub fn contains(&self, row: &NormalizedRow) -> bool {
        self.rows.contains(row)
    }

    pub fn remember(&mut self, row: NormalizedRow) {
        self.rows.insert(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What happened to one item row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDecision {
    Emit,
    DuplicateHeader,
    Excluded,
    HeaderPattern,
}

/// Drop counters for one normalization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub emitted: usize,
    pub duplicate_headers: usize,
    pub excluded: usize,
    pub header_patterns: usize,
}

impl NormalizeStats {
    fn record(&mut self, decision: RowDecision) {
        match decision {
            RowDecision::Emit => self.emitted += 1,
            RowDecision::DuplicateHeader => self.duplicate_headers += 1,
            RowDecision::Excluded => self.excluded += 1,
            RowDecision::HeaderPattern => self.header_patterns += 1,
        }
    }

    /// Rows dropped for any reason
    pub fn dropped(&self) -> usize {
        self.duplicate_headers + self.excluded + self.header_patterns
    }
}

/// Output of a normalization pass, ready for any sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTable {
    pub header: HeaderRow,
    pub rows: Vec<NormalizedRow>,
    pub seen_headers: SeenHeaders,
    pub stats: NormalizeStats,
}

/// Converts items to rows under a header sentinel and exclusion policy
#[derive(Debug, Clone)]
pub struct Normalizer {
    table_header_id: String,
    exclusions: ExclusionSet,
}

impl Normalizer {
    pub fn new(table_header_id: impl Into<String>, exclusions: ExclusionSet) -> Self {
        Self {
            table_header_id: table_header_id.into(),
            exclusions,
        }
    }

    /// Build from the configured sentinel and exclusion list
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.table_header_id.clone(),
            settings.exclusion_list.iter().cloned().collect(),
        )
    }

    pub fn table_header_id(&self) -> &str {
        &self.table_header_id
    }

    /// Normalize all items
    ///
    /// The header comes from the first item's column titles, so an empty
    /// item list is an `EmptyDataset` error. Every item must carry as many
    /// column values as the first one, else `SchemaMismatch`.
    pub fn normalize(&self, items: &[Item]) -> ExportResult<NormalizedTable> {
        let first = items.first().ok_or(ExportError::EmptyDataset)?;
        let header = HeaderRow::from_item(&self.table_header_id, first);
        let expected = first.column_values.len();

        let mut seen_headers = SeenHeaders::seeded(&header);
        let mut stats = NormalizeStats::default();
        let mut rows = Vec::with_capacity(items.len());

        for item in items {
            if item.column_values.len() != expected {
                return Err(ExportError::SchemaMismatch {
                    item_id: item.id.clone(),
                    expected,
                    found: item.column_values.len(),
                });
            }

            let row = item_row(item);
            let decision = self.classify(&row, &seen_headers);
            stats.record(decision);

            match decision {
                RowDecision::Emit => rows.push(row),
                RowDecision::HeaderPattern => {
                    debug!(item_name = %item.name, "Remembering header-pattern row");
                    seen_headers.remember(row);
                }
                RowDecision::DuplicateHeader | RowDecision::Excluded => {}
            }
        }

        info!(
            emitted = stats.emitted,
            duplicate_headers = stats.duplicate_headers,
            excluded = stats.excluded,
            header_patterns = stats.header_patterns,
            "Normalized board items"
        );

        Ok(NormalizedTable {
            header,
            rows,
            seen_headers,
            stats,
        })
    }

    /// Decide the fate of one row without mutating anything
    pub fn classify(&self, row: &NormalizedRow, seen_headers: &SeenHeaders) -> RowDecision {
        let first_cell = row.first().map(String::as_str).unwrap_or("");

        if seen_headers.contains(row) {
            RowDecision::DuplicateHeader
        } else if self.exclusions.contains(first_cell) {
            RowDecision::Excluded
        } else if first_cell == self.table_header_id {
            RowDecision::HeaderPattern
        } else {
            RowDecision::Emit
        }
    }
}
