//! Export module for monday-export
//!
//! Every sink receives the same header and rows from the normalizer; only
//! the destination format differs:
//! - CSV: `monday_data.csv`
//! - Workbook: `monday_data.xlsx` with a bold header and sized columns
//! - Google Sheets: the first sheet of a named spreadsheet, cleared first

pub mod csv;
pub mod google_auth;
pub mod sheets;
pub mod workbook;

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::{OutputFormat, OutputPaths, Settings};
use crate::error::{ExportError, ExportResult};
use crate::models::{HeaderRow, NormalizedRow};
use crate::services::NormalizedTable;

pub use self::csv::CsvSink;
pub use google_auth::{AccessTokenSource, ServiceAccountKey, ServiceAccountTokenSource};
pub use sheets::SheetsSink;
pub use workbook::WorkbookSink;

/// A destination for normalized rows
pub trait Sink {
    /// Where the rows end up, for the success message
    fn destination(&self) -> String;

    /// Persist the header followed by every row
    fn write(&mut self, header: &HeaderRow, rows: &[NormalizedRow]) -> ExportResult<()>;
}

/// Write a normalized table to a sink
pub fn write_table(sink: &mut dyn Sink, table: &NormalizedTable) -> ExportResult<()> {
    sink.write(&table.header, &table.rows)
}

/// Select and construct the sink named by `settings.output_format`
pub fn build_sink(settings: &Settings, paths: &OutputPaths) -> ExportResult<Box<dyn Sink>> {
    match settings.output_format {
        OutputFormat::Csv => {
            paths.ensure_output_dir()?;
            Ok(Box::new(CsvSink::new(paths.csv_file())))
        }
        OutputFormat::Excel => {
            paths.ensure_output_dir()?;
            Ok(Box::new(WorkbookSink::new(paths.workbook_file())))
        }
        OutputFormat::GoogleSheets => {
            let (credentials, sheet_name) = settings.google_target()?;
            let http = http_client(settings)?;
            let key = ServiceAccountKey::from_file(credentials)?;
            let token_source = ServiceAccountTokenSource::new(key, http.clone());
            Ok(Box::new(SheetsSink::new(
                http,
                Box::new(token_source),
                sheet_name,
                settings.sheets_api_url.clone(),
                settings.drive_api_url.clone(),
            )))
        }
    }
}

fn http_client(settings: &Settings) -> ExportResult<Client> {
    Client::builder()
        .timeout(settings.request_timeout_secs.map(Duration::from_secs))
        .build()
        .map_err(|e| ExportError::Http(format!("Failed to build HTTP client: {}", e)))
}
