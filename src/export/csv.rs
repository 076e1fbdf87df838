//! CSV export
//!
//! Writes the header and rows comma-delimited. Line endings are CRLF on
//! every platform.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tracing::info;

use super::Sink;
use crate::error::{ExportError, ExportResult};
use crate::models::{HeaderRow, NormalizedRow};

/// Write header and rows as CSV to any writer
pub fn write_csv<W: Write>(
    writer: W,
    header: &HeaderRow,
    rows: &[NormalizedRow],
) -> ExportResult<()> {
    let mut csv_writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::CRLF)
        .from_writer(writer);

    csv_writer.write_record(header.cells())?;
    for row in rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;

    Ok(())
}

/// Sink that truncates and rewrites a CSV file
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Sink for CsvSink {
    fn destination(&self) -> String {
        self.path.display().to_string()
    }

    fn write(&mut self, header: &HeaderRow, rows: &[NormalizedRow]) -> ExportResult<()> {
        let file = File::create(&self.path).map_err(|e| {
            ExportError::Export(format!(
                "Failed to create file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        write_csv(BufWriter::new(file), header, rows)?;
        info!(path = %self.path.display(), rows = rows.len(), "Wrote CSV");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnValue, Item};
    use tempfile::TempDir;

    fn header() -> HeaderRow {
        let item = Item {
            id: "1".into(),
            name: "n".into(),
            column_values: vec![ColumnValue {
                id: "status".into(),
                column_type: "status".into(),
                text: None,
                column_title: "Status".into(),
            }],
        };
        HeaderRow::from_item("Item ID", &item)
    }

    fn rows() -> Vec<NormalizedRow> {
        vec![
            vec!["1".into(), "Plan, then build".into(), "Done".into()],
            vec!["2".into(), "Say \"hi\"".into(), "".into()],
        ]
    }

    #[test]
    fn test_write_csv_quotes_and_crlf() {
        let mut csv_output = Vec::new();
        write_csv(&mut csv_output, &header(), &rows()).unwrap();

        let csv_string = String::from_utf8(csv_output).unwrap();
        assert_eq!(
            csv_string,
            "Item ID,Item Name,Status\r\n1,\"Plan, then build\",Done\r\n2,\"Say \"\"hi\"\"\",\r\n"
        );
    }

    #[test]
    fn test_sink_truncates_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("monday_data.csv");
        std::fs::write(&path, "stale content that is much longer than the export\n".repeat(50))
            .unwrap();

        let mut sink = CsvSink::new(&path);
        sink.write(&header(), &rows()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Item ID,Item Name,Status"));
        assert!(!contents.contains("stale"));
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn test_header_only_when_no_rows() {
        let mut csv_output = Vec::new();
        write_csv(&mut csv_output, &header(), &[]).unwrap();
        assert_eq!(String::from_utf8(csv_output).unwrap(), "Item ID,Item Name,Status\r\n");
    }
}
