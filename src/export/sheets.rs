//! Google Sheets export
//!
//! Opens a spreadsheet by name, clears its first sheet, then appends the
//! header and each row with one API call per row.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::google_auth::AccessTokenSource;
use super::Sink;
use crate::config::SecureString;
use crate::error::{ExportError, ExportResult};
use crate::models::{HeaderRow, NormalizedRow};

const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// A1 range naming a whole sheet, e.g. `'Sheet1'`
pub fn sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Drive search expression for a spreadsheet titled `name`
pub fn spreadsheet_query(name: &str) -> String {
    format!(
        "name = '{}' and mimeType = '{}' and trashed = false",
        name.replace('\\', "\\\\").replace('\'', "\\'"),
        SPREADSHEET_MIME_TYPE
    )
}

/// Sink that replaces the first sheet of a Google spreadsheet
pub struct SheetsSink {
    http: Client,
    token_source: Box<dyn AccessTokenSource>,
    sheet_name: String,
    sheets_api_url: String,
    drive_api_url: String,
}

impl SheetsSink {
    pub fn new(
        http: Client,
        token_source: Box<dyn AccessTokenSource>,
        sheet_name: impl Into<String>,
        sheets_api_url: impl Into<String>,
        drive_api_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_source,
            sheet_name: sheet_name.into(),
            sheets_api_url: sheets_api_url.into().trim_end_matches('/').to_string(),
            drive_api_url: drive_api_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn send(
        &self,
        request: RequestBuilder,
        token: &SecureString,
        action: &str,
    ) -> ExportResult<Response> {
        let response = request.bearer_auth(token.expose()).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ExportError::Auth(format!(
                "Google rejected {} (HTTP {}): {}",
                action, status, body
            ))),
            _ => Err(ExportError::Export(format!(
                "Google Sheets {} failed (HTTP {}): {}",
                action, status, body
            ))),
        }
    }

    /// Spreadsheet ID of the first spreadsheet named `sheet_name`
    fn find_spreadsheet(&self, token: &SecureString) -> ExportResult<String> {
        let request = self
            .http
            .get(format!("{}/drive/v3/files", self.drive_api_url))
            .query(&[
                ("q", spreadsheet_query(&self.sheet_name).as_str()),
                ("fields", "files(id,name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ]);

        let list: DriveFileList = self.send(request, token, "spreadsheet lookup")?.json()?;
        list.files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| {
                ExportError::Export(format!(
                    "Spreadsheet '{}' not found or not shared with the service account",
                    self.sheet_name
                ))
            })
    }

    fn first_sheet_title(
        &self,
        token: &SecureString,
        spreadsheet_id: &str,
    ) -> ExportResult<String> {
        let request = self
            .http
            .get(format!("{}/v4/spreadsheets/{}", self.sheets_api_url, spreadsheet_id))
            .query(&[("fields", "sheets.properties")]);

        let metadata: SpreadsheetMetadata =
            self.send(request, token, "metadata lookup")?.json()?;
        metadata
            .sheets
            .into_iter()
            .next()
            .map(|s| s.properties.title)
            .ok_or_else(|| {
                ExportError::Export(format!("Spreadsheet '{}' has no sheets", self.sheet_name))
            })
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str, action: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}:{}",
            self.sheets_api_url,
            spreadsheet_id,
            urlencoding::encode(range),
            action
        )
    }

    fn clear(&self, token: &SecureString, spreadsheet_id: &str, range: &str) -> ExportResult<()> {
        let request = self
            .http
            .post(self.values_url(spreadsheet_id, range, "clear"))
            .json(&json!({}));
        self.send(request, token, "clear")?;
        Ok(())
    }

    fn append_row(
        &self,
        token: &SecureString,
        spreadsheet_id: &str,
        range: &str,
        row: &[String],
    ) -> ExportResult<()> {
        let request = self
            .http
            .post(self.values_url(spreadsheet_id, range, "append"))
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "values": [row] }));
        self.send(request, token, "append")?;
        Ok(())
    }
}

impl Sink for SheetsSink {
    fn destination(&self) -> String {
        format!("Google Sheets '{}'", self.sheet_name)
    }

    fn write(&mut self, header: &HeaderRow, rows: &[NormalizedRow]) -> ExportResult<()> {
        let token = self.token_source.access_token()?;
        let spreadsheet_id = self.find_spreadsheet(&token)?;
        let title = self.first_sheet_title(&token, &spreadsheet_id)?;
        let range = sheet_range(&title);
        info!(spreadsheet_id = %spreadsheet_id, sheet = %title, "Replacing sheet contents");

        self.clear(&token, &spreadsheet_id, &range)?;
        self.append_row(&token, &spreadsheet_id, &range, header.cells())?;

        for (i, row) in rows.iter().enumerate() {
            self.append_row(&token, &spreadsheet_id, &range, row)?;
            debug!(row = i + 1, total = rows.len(), "Appended row");
        }

        info!(sheet = %title, rows = rows.len(), "Wrote Google Sheet");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnValue, Item};
    use mockito::{Matcher, Server};

    struct StaticToken;

    impl AccessTokenSource for StaticToken {
        fn access_token(&self) -> ExportResult<SecureString> {
            Ok(SecureString::new("ya29.static"))
        }
    }

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

    fn sink(server: &Server) -> SheetsSink {
        SheetsSink::new(
            Client::new(),
            Box::new(StaticToken),
            "Roadmap Export",
            server.url(),
            server.url(),
        )
    }

    fn mock_lookup(server: &mut Server) -> (mockito::Mock, mockito::Mock) {
        let drive = server
            .mock("GET", Matcher::Regex(r"^/drive/v3/files".into()))
            .match_header("authorization", "Bearer ya29.static")
            .match_query(Matcher::UrlEncoded(
                "q".into(),
                spreadsheet_query("Roadmap Export"),
            ))
            .with_status(200)
            .with_body(r#"{"files": [{"id": "sheet-123", "name": "Roadmap Export"}]}"#)
            .create();
        let metadata = server
            .mock("GET", Matcher::Regex(r"^/v4/spreadsheets/sheet-123(\?.*)?$".into()))
            .with_status(200)
            .with_body(r#"{"sheets": [{"properties": {"title": "Sheet1", "index": 0}}]}"#)
            .create();
        (drive, metadata)
    }

    fn mock_append(
        server: &mut Server,
        row: serde_json::Value,
        status: usize,
        hits: usize,
    ) -> mockito::Mock {
        server
            .mock("POST", Matcher::Regex(r"^/v4/spreadsheets/sheet-123/values/.+:append".into()))
            .match_query(Matcher::UrlEncoded("valueInputOption".into(), "RAW".into()))
            .match_body(Matcher::Json(json!({ "values": [row] })))
            .with_status(status)
            .with_body("{}")
            .expect(hits)
            .create()
    }

    fn rows() -> Vec<NormalizedRow> {
        vec![
            vec!["1".into(), "Alpha".into(), "Done".into()],
            vec!["2".into(), "Beta".into(), "".into()],
        ]
    }

    #[test]
    fn test_clears_then_appends_each_row() {
        let mut server = Server::new();
        let _lookup = mock_lookup(&mut server);
        let clear = server
            .mock("POST", Matcher::Regex(r"^/v4/spreadsheets/sheet-123/values/.+:clear".into()))
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create();
        let header_append =
            mock_append(&mut server, json!(["Item ID", "Item Name", "Status"]), 200, 1);
        let first_append = mock_append(&mut server, json!(["1", "Alpha", "Done"]), 200, 1);
        let second_append = mock_append(&mut server, json!(["2", "Beta", ""]), 200, 1);

        sink(&server).write(&header(), &rows()).unwrap();

        clear.assert();
        header_append.assert();
        first_append.assert();
        second_append.assert();
    }

    #[test]
    fn test_header_is_appended_before_rows() {
        let mut server = Server::new();
        let _lookup = mock_lookup(&mut server);
        server
            .mock("POST", Matcher::Regex(r":clear".into()))
            .with_status(200)
            .with_body("{}")
            .create();
        // A failed header append must stop before any row is sent.
        let header_append =
            mock_append(&mut server, json!(["Item ID", "Item Name", "Status"]), 500, 1);
        let first_append = mock_append(&mut server, json!(["1", "Alpha", "Done"]), 200, 0);
        let second_append = mock_append(&mut server, json!(["2", "Beta", ""]), 200, 0);

        let err = sink(&server).write(&header(), &rows()).unwrap_err();

        assert!(matches!(err, ExportError::Export(ref msg) if msg.contains("append")));
        header_append.assert();
        first_append.assert();
        second_append.assert();
    }

    #[test]
    fn test_missing_spreadsheet_is_export_error() {
        let mut server = Server::new();
        server
            .mock("GET", Matcher::Regex(r"^/drive/v3/files".into()))
            .with_status(200)
            .with_body(r#"{"files": []}"#)
            .create();
        let clear = server
            .mock("POST", Matcher::Regex(r":clear".into()))
            .expect(0)
            .create();

        let err = sink(&server).write(&header(), &[]).unwrap_err();

        assert!(matches!(err, ExportError::Export(ref msg) if msg.contains("Roadmap Export")));
        clear.assert();
    }

    #[test]
    fn test_forbidden_is_auth_error() {
        let mut server = Server::new();
        server
            .mock("GET", Matcher::Regex(r"^/drive/v3/files".into()))
            .with_status(403)
            .with_body(r#"{"error": {"message": "insufficient scopes"}}"#)
            .create();

        let err = sink(&server).write(&header(), &[]).unwrap_err();
        assert!(matches!(err, ExportError::Auth(_)));
    }

    #[test]
    fn test_sheet_range_quotes_title() {
        assert_eq!(sheet_range("Sheet1"), "'Sheet1'");
        assert_eq!(sheet_range("Bob's data"), "'Bob''s data'");
    }

    #[test]
    fn test_spreadsheet_query_escapes_quotes() {
        assert_eq!(
            spreadsheet_query("Q1 'plan'"),
            "name = 'Q1 \\'plan\\'' and mimeType = 'application/vnd.google-apps.spreadsheet' and trashed = false"
        );
    }
}
