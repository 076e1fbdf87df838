//! Excel workbook export
//!
//! One sheet named "Monday Data": a bold header on row 1, data from row 2,
//! and every column sized to its longest value plus a two character margin.

use std::path::PathBuf;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::info;

use super::Sink;
use crate::error::{ExportError, ExportResult};
use crate::models::{HeaderRow, NormalizedRow};

pub const SHEET_NAME: &str = "Monday Data";

/// Extra characters added to each column's widest value
const WIDTH_MARGIN: usize = 2;

/// Excel's column width ceiling
const MAX_COLUMN_WIDTH: usize = 255;

/// Width of each column: longest cell (header included) + margin
pub fn column_widths(header: &HeaderRow, rows: &[NormalizedRow]) -> Vec<usize> {
    let mut widths: Vec<usize> = header.cells().iter().map(|c| c.chars().count()).collect();

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    widths
        .into_iter()
        .map(|w| (w + WIDTH_MARGIN).min(MAX_COLUMN_WIDTH))
        .collect()
}

/// Build the workbook in memory
pub fn build_workbook(header: &HeaderRow, rows: &[NormalizedRow]) -> ExportResult<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, value) in header.cells().iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(col)?, value, &bold)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let row_num = row_index(i + 1)?;
        for (col, value) in row.iter().enumerate() {
            // Empty cells stay blank rather than holding an empty string.
            if !value.is_empty() {
                worksheet.write_string(row_num, column_index(col)?, value)?;
            }
        }
    }

    size_columns(worksheet, &column_widths(header, rows))?;

    Ok(workbook)
}

fn size_columns(worksheet: &mut Worksheet, widths: &[usize]) -> ExportResult<()> {
    for (col, width) in widths.iter().enumerate() {
        worksheet.set_column_width(column_index(col)?, *width as f64)?;
    }
    Ok(())
}

fn column_index(col: usize) -> ExportResult<u16> {
    u16::try_from(col)
        .map_err(|_| ExportError::Export(format!("Column {} exceeds the workbook limit", col)))
}

fn row_index(row: usize) -> ExportResult<u32> {
    u32::try_from(row)
        .map_err(|_| ExportError::Export(format!("Row {} exceeds the workbook limit", row)))
}

/// Sink that writes a fresh .xlsx file
#[derive(Debug, Clone)]
pub struct WorkbookSink {
    path: PathBuf,
}

impl WorkbookSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Sink for WorkbookSink {
    fn destination(&self) -> String {
        self.path.display().to_string()
    }

    fn write(&mut self, header: &HeaderRow, rows: &[NormalizedRow]) -> ExportResult<()> {
        let mut workbook = build_workbook(header, rows)?;
        workbook.save(&self.path)?;
        info!(path = %self.path.display(), rows = rows.len(), "Wrote workbook");
        Ok(())
    }
}
