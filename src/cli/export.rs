//! CLI command for exporting a board
//!
//! Fetches the configured board, normalizes its items and hands the rows
//! to the sink selected by `output_format`.

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::{info, warn};

use super::load_settings;
use crate::config::{read_api_token, OutputFormat, OutputPaths, Settings};
use crate::error::ExportResult;
use crate::export::{build_sink, write_table, Sink};
use crate::monday::{BoardFetcher, GraphQlTransport, HttpTransport};
use crate::services::{NormalizeStats, Normalizer};

/// Arguments for the export command
#[derive(Args, Debug, Default, Clone)]
pub struct ExportArgs {
    /// Override the configured output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Directory for monday_data.csv and monday_data.xlsx
    #[arg(short, long, env = "MONDAY_EXPORT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,
}

impl ExportArgs {
    /// Fill unset fields from `fallback`
    pub fn or(self, fallback: ExportArgs) -> Self {
        Self {
            format: self.format.or(fallback.format),
            output_dir: self.output_dir.or(fallback.output_dir),
        }
    }
}

/// Outcome of a successful export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub board_name: String,
    pub destination: String,
    pub items_fetched: usize,
    pub stats: NormalizeStats,
    /// Pagination stopped early on an API error
    pub truncated: bool,
}

impl ExportSummary {
    pub fn rows_written(&self) -> usize {
        self.stats.emitted
    }
}

/// Fetch, normalize and write one board
pub fn run_export<T: GraphQlTransport>(
    settings: &Settings,
    fetcher: &mut BoardFetcher<T>,
    sink: &mut dyn Sink,
) -> ExportResult<ExportSummary> {
    let board = fetcher.fetch_board(&settings.board_name)?;
    let table = Normalizer::from_settings(settings).normalize(&board.items)?;

    info!(destination = %sink.destination(), rows = table.rows.len(), "Writing rows");
    write_table(sink, &table)?;

    Ok(ExportSummary {
        board_name: board.board_name,
        destination: sink.destination(),
        items_fetched: board.items.len(),
        stats: table.stats,
        truncated: board.truncated,
    })
}

/// Handle the export command
pub fn handle_export_command(config: Option<&Path>, args: ExportArgs) -> ExportResult<()> {
    let (_, mut settings) = load_settings(config)?;
    if let Some(format) = args.format {
        settings = settings.with_output_format(format)?;
    }

    let token = read_api_token(&settings.api_token_path)?;
    let transport = HttpTransport::from_settings(&settings, token)?;
    let mut fetcher = BoardFetcher::new(transport).with_page_size(settings.page_size);

    // Credentials and output directory are checked before any request.
    let paths = OutputPaths::new(args.output_dir);
    let mut sink = build_sink(&settings, &paths)?;

    let summary = run_export(&settings, &mut fetcher, sink.as_mut())?;

    println!("Data successfully written to {}!", summary.destination);
    println!(
        "Exported {} of {} items from board '{}' ({} skipped)",
        summary.rows_written(),
        summary.items_fetched,
        summary.board_name,
        summary.stats.dropped()
    );
    if summary.truncated {
        warn!("Export is partial: pagination stopped after an API error");
        println!("Warning: not every page could be fetched; the export is partial.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::models::{HeaderRow, NormalizedRow};
    use crate::monday::GraphQlResponse;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct CannedTransport {
        responses: RefCell<VecDeque<Value>>,
    }

    impl CannedTransport {
        fn new(responses: Vec<Value>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
            }
        }
    }

    impl GraphQlTransport for CannedTransport {
        fn execute(&self, _query: &str) -> ExportResult<GraphQlResponse> {
            let value = self
                .responses
                .borrow_mut()
                .pop_front()
                .expect("unexpected extra query");
            GraphQlResponse::from_value(value)
        }
    }

    #[derive(Default)]
    struct MemorySink {
        header: Vec<String>,
        rows: Vec<NormalizedRow>,
    }

    impl Sink for MemorySink {
        fn destination(&self) -> String {
            "memory".into()
        }

        fn write(&mut self, header: &HeaderRow, rows: &[NormalizedRow]) -> ExportResult<()> {
            self.header = header.cells().to_vec();
            self.rows = rows.to_vec();
            Ok(())
        }
    }

    fn item(id: &str, name: &str, status: Option<&str>) -> Value {
        json!({
            "id": id,
            "name": name,
            "column_values": [
                {"id": "status", "type": "status", "text": status, "column": {"title": "Status"}}
            ]
        })
    }

    fn settings() -> Settings {
        Settings::from_json(
            r#"{"api_token_path": "token", "board_name": "Roadmap",
                "output_format": "csv", "exclusion_list": ["3"]}"#,
        )
        .unwrap()
    }

    fn boards() -> Value {
        json!({"data": {"boards": [{"id": "77", "name": "Roadmap"}]}})
    }

    #[test]
    fn test_run_export_writes_normalized_rows() {
        let transport = CannedTransport::new(vec![
            boards(),
            json!({"data": {"boards": [{
                "name": "Roadmap",
                "columns": [{"id": "status", "title": "Status", "type": "status"}],
                "items_page": {"cursor": "c1", "items": [
                    item("1", "Alpha", Some("Done")),
                    item("Item ID", "Item Name", Some("Status"))
                ]}
            }]}}),
            json!({"data": {"next_items_page": {"cursor": null, "items": [
                item("2", "Beta", None),
                item("3", "Excluded", Some("Stuck"))
            ]}}}),
        ]);
        let mut fetcher = BoardFetcher::new(transport);
        let mut sink = MemorySink::default();

        let summary = run_export(&settings(), &mut fetcher, &mut sink).unwrap();

        assert_eq!(sink.header, vec!["Item ID", "Item Name", "Status"]);
        assert_eq!(
            sink.rows,
            vec![
                vec!["1".to_string(), "Alpha".into(), "Done".into()],
                vec!["2".to_string(), "Beta".into(), "".into()],
            ]
        );
        assert_eq!(summary.items_fetched, 4);
        assert_eq!(summary.rows_written(), 2);
        assert_eq!(summary.stats.dropped(), 2);
        assert!(!summary.truncated);
        assert_eq!(summary.destination, "memory");
    }

    #[test]
    fn test_run_export_empty_board_writes_nothing() {
        let transport = CannedTransport::new(vec![
            boards(),
            json!({"data": {"boards": [{
                "name": "Roadmap",
                "columns": [],
                "items_page": {"cursor": null, "items": []}
            }]}}),
        ]);
        let mut fetcher = BoardFetcher::new(transport);
        let mut sink = MemorySink::default();

        let err = run_export(&settings(), &mut fetcher, &mut sink).unwrap_err();

        assert!(matches!(err, ExportError::EmptyDataset));
        assert!(sink.header.is_empty());
    }

    #[test]
    fn test_args_prefer_own_values() {
        let sub = ExportArgs {
            format: Some(OutputFormat::Excel),
            output_dir: None,
        };
        let top = ExportArgs {
            format: Some(OutputFormat::Csv),
            output_dir: Some(PathBuf::from("out")),
        };

        let merged = sub.or(top);
        assert_eq!(merged.format, Some(OutputFormat::Excel));
        assert_eq!(merged.output_dir, Some(PathBuf::from("out")));
    }
}
