//! GraphQL response envelope
//!
//! Every Monday.com response is `{"data": ..., "errors": [...]}`. The
//! presence of an `errors` list (or a bare `error_message`) marks the whole
//! response as failed.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::error;

use crate::error::{ExportError, ExportResult};
use crate::models::{BoardSummary, Column, Item};

/// Source position attached to a GraphQL error
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorLocation {
    pub line: Option<u64>,
    pub column: Option<u64>,
}

/// One entry of a GraphQL `errors` list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub locations: Vec<ErrorLocation>,
}

impl GraphQlError {
    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or("unknown error")
    }
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl GraphQlResponse {
    /// Parse a raw response body
    pub fn from_value(value: serde_json::Value) -> ExportResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| ExportError::Json(format!("Unexpected Monday.com response shape: {}", e)))
    }

    /// The error list, if the response carries one
    pub fn error_list(&self) -> Option<Vec<GraphQlError>> {
        match (&self.errors, &self.error_message) {
            (Some(errors), _) => Some(errors.clone()),
            (None, Some(message)) => Some(vec![GraphQlError {
                message: Some(message.clone()),
                locations: Vec::new(),
            }]),
            (None, None) => None,
        }
    }

    /// Extract and decode `data`, logging and converting any error list into `Api`
    ///
    /// The error list is checked before `data` is decoded, since failed
    /// responses often carry a null or partial payload.
    pub fn into_data<T: DeserializeOwned>(self) -> ExportResult<T> {
        if let Some(errors) = self.error_list() {
            log_errors(&errors);
            return Err(ExportError::Api {
                messages: errors
                    .iter()
                    .map(|e| e.message_or_default().to_string())
                    .collect(),
            });
        }

        match self.data {
            Some(serde_json::Value::Null) | None => Err(ExportError::Api {
                messages: vec!["response carried no data".to_string()],
            }),
            Some(data) => serde_json::from_value(data).map_err(|e| {
                ExportError::Json(format!("Unexpected Monday.com response shape: {}", e))
            }),
        }
    }
}

/// Log each error with its source locations
pub fn log_errors(errors: &[GraphQlError]) {
    for err in errors {
        error!("Monday.com API error: {}", err.message_or_default());
        for loc in &err.locations {
            error!(
                "  at line {}, column {}",
                loc.line.map_or_else(|| "?".to_string(), |l| l.to_string()),
                loc.column.map_or_else(|| "?".to_string(), |c| c.to_string())
            );
        }
    }
}

/// Payload of the board-list query
#[derive(Debug, Deserialize)]
pub struct BoardsData {
    pub boards: Vec<BoardSummary>,
}

/// A page of items and the cursor to the next one
#[derive(Debug, Deserialize)]
pub struct ItemsPage {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// One board from the first-page query
#[derive(Debug, Deserialize)]
pub struct BoardPage {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    pub items_page: ItemsPage,
}

/// Payload of the first-page query
#[derive(Debug, Deserialize)]
pub struct FirstPageData {
    pub boards: Vec<BoardPage>,
}

/// Payload of the continuation query
#[derive(Debug, Deserialize)]
pub struct NextPageData {
    pub next_items_page: ItemsPage,
}
