//! Custom error types for monday-export
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for monday-export operations
#[derive(Error, Debug)]
pub enum ExportError {
    /// Configuration-related errors (missing keys, unreadable config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Missing or rejected credentials (API token, service account)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// No accessible board carries the requested name
    #[error("Board not found: {board_name}")]
    BoardNotFound { board_name: String },

    /// The GraphQL API answered with an error list
    #[error("Monday.com API error: {}", messages.join("; "))]
    Api { messages: Vec<String> },

    /// The board has no items, so no header can be derived
    #[error("Board returned no items; nothing to export")]
    EmptyDataset,

    /// `output_format` names a sink that does not exist
    #[error("Unsupported output format '{0}'; choose 'google_sheets', 'csv', or 'excel'")]
    UnsupportedFormat(String),

    /// An item's column count disagrees with the first item's
    #[error("Item {item_id} has {found} column values, expected {expected}")]
    SchemaMismatch {
        item_id: String,
        expected: usize,
        found: usize,
    },

    /// Transport-level HTTP failures
    #[error("HTTP error: {0}")]
    Http(String),

    /// Sink write failures
    #[error("Export error: {0}")]
    Export(String),
}

impl ExportError {
    /// Create a "board not found" error
    pub fn board_not_found(board_name: impl Into<String>) -> Self {
        Self::BoardNotFound {
            board_name: board_name.into(),
        }
    }

    /// Check if this is a "board not found" error
    pub fn is_board_not_found(&self) -> bool {
        matches!(self, Self::BoardNotFound { .. })
    }

    /// Check if this is a GraphQL error-list error
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for ExportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Export(format!("CSV: {}", err))
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(format!("Workbook: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for ExportError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Auth(format!("Failed to sign service account assertion: {}", err))
    }
}

/// Result type alias for monday-export operations
pub type ExportResult<T> = Result<T, ExportError>;
