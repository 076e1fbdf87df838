//! Export settings for monday-export
//!
//! Loads the JSON configuration file describing which board to export,
//! where the API token lives, and which sink receives the rows.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};

/// Monday.com GraphQL endpoint
pub const DEFAULT_API_URL: &str = "https://api.monday.com/v2";

/// Items requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Largest page the items_page accessor accepts
pub const MAX_PAGE_SIZE: u32 = 500;

/// Sentinel placed in the first header cell
pub const DEFAULT_TABLE_HEADER_ID: &str = "Item ID";

pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com";
pub const DEFAULT_DRIVE_API_URL: &str = "https://www.googleapis.com";

/// Output sink selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Google Sheets spreadsheet (first sheet is cleared and repopulated)
    #[default]
    #[value(name = "google_sheets")]
    GoogleSheets,
    /// monday_data.csv
    Csv,
    /// monday_data.xlsx
    Excel,
}

impl FromStr for OutputFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google_sheets" => Ok(Self::GoogleSheets),
            "csv" => Ok(Self::Csv),
            "excel" => Ok(Self::Excel),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GoogleSheets => "google_sheets",
            Self::Csv => "csv",
            Self::Excel => "excel",
        };
        write!(f, "{}", name)
    }
}

/// The config file as written on disk, before validation
#[derive(Debug, Clone, Deserialize)]
struct RawSettings {
    api_token_path: PathBuf,
    board_name: String,
    #[serde(default = "default_output_format")]
    output_format: String,
    #[serde(default = "default_table_header_id")]
    table_header_id: String,
    #[serde(default)]
    exclusion_list: Vec<String>,
    #[serde(default)]
    google_credentials: Option<PathBuf>,
    #[serde(default)]
    google_sheet_name: Option<String>,
    #[serde(default = "default_api_url")]
    api_url: String,
    #[serde(default = "default_page_size")]
    page_size: u32,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
    #[serde(default = "default_sheets_api_url")]
    sheets_api_url: String,
    #[serde(default = "default_drive_api_url")]
    drive_api_url: String,
}

fn default_output_format() -> String {
    OutputFormat::default().to_string()
}

fn default_table_header_id() -> String {
    DEFAULT_TABLE_HEADER_ID.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_sheets_api_url() -> String {
    DEFAULT_SHEETS_API_URL.to_string()
}

fn default_drive_api_url() -> String {
    DEFAULT_DRIVE_API_URL.to_string()
}

/// Validated export settings
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    /// Path to the plaintext Monday.com API token
    pub api_token_path: PathBuf,

    /// Exact name of the board to export
    pub board_name: String,

    /// Selected output sink
    pub output_format: OutputFormat,

    /// First header cell, also the marker of embedded header rows
    pub table_header_id: String,

    /// Item IDs that are never written
    pub exclusion_list: Vec<String>,

    /// Service account key file (Google Sheets only)
    pub google_credentials: Option<PathBuf>,

    /// Spreadsheet title (Google Sheets only)
    pub google_sheet_name: Option<String>,

    /// GraphQL endpoint
    pub api_url: String,

    /// Items requested per page
    pub page_size: u32,

    /// HTTP timeout; `None` waits indefinitely
    pub request_timeout_secs: Option<u64>,

    pub sheets_api_url: String,
    pub drive_api_url: String,
}

impl TryFrom<RawSettings> for Settings {
    type Error = ExportError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let settings = Self {
            api_token_path: raw.api_token_path,
            board_name: raw.board_name,
            output_format: raw.output_format.parse()?,
            table_header_id: raw.table_header_id,
            exclusion_list: raw.exclusion_list,
            google_credentials: raw.google_credentials,
            google_sheet_name: raw.google_sheet_name,
            api_url: raw.api_url,
            page_size: raw.page_size,
            request_timeout_secs: raw.request_timeout_secs,
            sheets_api_url: raw.sheets_api_url,
            drive_api_url: raw.drive_api_url,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Settings {
    /// Load settings from a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> ExportResult<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|e| {
            ExportError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&contents).map_err(|e| match e {
            ExportError::Json(msg) => ExportError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                msg
            )),
            other => other,
        })
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> ExportResult<Self> {
        let raw: RawSettings = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Replace the output format, re-checking sink requirements
    pub fn with_output_format(mut self, format: OutputFormat) -> ExportResult<Self> {
        self.output_format = format;
        self.validate()?;
        Ok(self)
    }

    /// Check cross-field requirements
    pub fn validate(&self) -> ExportResult<()> {
        if self.board_name.is_empty() {
            return Err(ExportError::Config("'board_name' must not be empty".into()));
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ExportError::Config(format!(
                "'page_size' must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }

        if self.output_format == OutputFormat::GoogleSheets {
            if self.google_credentials.is_none() {
                return Err(ExportError::Config(
                    "'google_credentials' is required when output_format is 'google_sheets'"
                        .into(),
                ));
            }
            if self.google_sheet_name.is_none() {
                return Err(ExportError::Config(
                    "'google_sheet_name' is required when output_format is 'google_sheets'"
                        .into(),
                ));
            }
        }

        Ok(())
    }

    /// Credentials path and spreadsheet name for the Google Sheets sink
    pub fn google_target(&self) -> ExportResult<(&Path, &str)> {
        match (&self.google_credentials, &self.google_sheet_name) {
            (Some(credentials), Some(sheet_name)) => Ok((credentials.as_path(), sheet_name)),
            _ => Err(ExportError::Config(
                "Google Sheets output needs 'google_credentials' and 'google_sheet_name'".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"{
        "api_token_path": "token.txt",
        "board_name": "Roadmap",
        "output_format": "csv"
    }"#;

    #[test]
    fn test_defaults_applied() {
        let settings = Settings::from_json(MINIMAL).unwrap();
        assert_eq!(settings.board_name, "Roadmap");
        assert_eq!(settings.output_format, OutputFormat::Csv);
        assert_eq!(settings.table_header_id, "Item ID");
        assert!(settings.exclusion_list.is_empty());
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.page_size, 100);
        assert_eq!(settings.request_timeout_secs, None);
    }

    #[test]
    fn test_default_format_is_google_sheets() {
        let json = r#"{
            "api_token_path": "token.txt",
            "board_name": "Roadmap",
            "google_credentials": "creds.json",
            "google_sheet_name": "Roadmap Export"
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.output_format, OutputFormat::GoogleSheets);
        let (creds, name) = settings.google_target().unwrap();
        assert_eq!(creds, Path::new("creds.json"));
        assert_eq!(name, "Roadmap Export");
    }

    #[test]
    fn test_google_sheets_requires_credentials() {
        let json = r#"{
            "api_token_path": "token.txt",
            "board_name": "Roadmap",
            "google_sheet_name": "Roadmap Export"
        }"#;
        let err = Settings::from_json(json).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("google_credentials"));
    }

    #[test]
    fn test_unsupported_format() {
        let json = r#"{
            "api_token_path": "token.txt",
            "board_name": "Roadmap",
            "output_format": "parquet"
        }"#;
        let err = Settings::from_json(json).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(ref f) if f == "parquet"));
    }

    #[test]
    fn test_missing_required_key_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("monday-data-export.conf");
        std::fs::write(&path, r#"{"api_token_path": "token.txt"}"#).unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("board_name"));
    }

    #[test]
    fn test_page_size_bounds() {
        let json = r#"{
            "api_token_path": "token.txt",
            "board_name": "Roadmap",
            "output_format": "excel",
            "page_size": 0
        }"#;
        assert!(Settings::from_json(json).unwrap_err().is_config());
    }

    #[test]
    fn test_with_output_format_revalidates() {
        let settings = Settings::from_json(MINIMAL).unwrap();
        let err = settings
            .clone()
            .with_output_format(OutputFormat::GoogleSheets)
            .unwrap_err();
        assert!(err.is_config());

        let excel = settings.with_output_format(OutputFormat::Excel).unwrap();
        assert_eq!(excel.output_format, OutputFormat::Excel);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("monday-data-export.conf");
        std::fs::write(
            &path,
            r#"{
                "api_token_path": "token.txt",
                "board_name": "Roadmap",
                "output_format": "excel",
                "table_header_id": "Task",
                "exclusion_list": ["42", "43"]
            }"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.output_format, OutputFormat::Excel);
        assert_eq!(settings.table_header_id, "Task");
        assert_eq!(settings.exclusion_list, vec!["42", "43"]);
    }

    #[test]
    fn test_output_format_round_trip_names() {
        for format in [OutputFormat::GoogleSheets, OutputFormat::Csv, OutputFormat::Excel] {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
    }
}
