//! GraphQL transport
//!
//! The fetcher talks to Monday.com through [`GraphQlTransport`] so the
//! pagination logic can run against scripted responses in tests.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::json;
use tracing::debug;

use super::response::GraphQlResponse;
use crate::config::{SecureString, Settings};
use crate::error::{ExportError, ExportResult};

/// Sends one GraphQL query and returns the parsed envelope
pub trait GraphQlTransport {
    fn execute(&self, query: &str) -> ExportResult<GraphQlResponse>;
}

/// Blocking HTTP transport against the Monday.com API
pub struct HttpTransport {
    client: Client,
    api_url: String,
    token: SecureString,
}

impl HttpTransport {
    /// Create a transport; `timeout` of `None` waits indefinitely
    pub fn new(
        api_url: impl Into<String>,
        token: SecureString,
        timeout: Option<Duration>,
    ) -> ExportResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("monday-export/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ExportError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            token,
        })
    }

    pub fn from_settings(settings: &Settings, token: SecureString) -> ExportResult<Self> {
        Self::new(
            settings.api_url.clone(),
            token,
            settings.request_timeout_secs.map(Duration::from_secs),
        )
    }

    fn auth_header(&self) -> ExportResult<HeaderValue> {
        let mut value = HeaderValue::from_str(self.token.expose()).map_err(|_| {
            ExportError::Auth("API token contains characters not allowed in a header".into())
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl GraphQlTransport for HttpTransport {
    fn execute(&self, query: &str) -> ExportResult<GraphQlResponse> {
        debug!(url = %self.api_url, query_len = query.len(), "Sending GraphQL query");

        let response = self
            .client
            .post(&self.api_url)
            .header(AUTHORIZATION, self.auth_header()?)
            .json(&json!({ "query": query }))
            .send()?;

        let status = response.status();
        let body: serde_json::Value = match response.json() {
            Ok(body) => body,
            Err(e) => return Err(status_error(status).unwrap_or_else(|| e.into())),
        };

        let parsed = GraphQlResponse::from_value(body)?;

        // An error list takes precedence over the status code.
        if parsed.error_list().is_none() {
            if let Some(err) = status_error(status) {
                return Err(err);
            }
        }

        Ok(parsed)
    }
}

fn status_error(status: StatusCode) -> Option<ExportError> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(ExportError::Auth(format!(
            "Monday.com rejected the API token (HTTP {})",
            status
        ))),
        s if !s.is_success() => Some(ExportError::Http(format!(
            "Monday.com returned HTTP {}",
            s
        ))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn transport(server: &Server) -> HttpTransport {
        HttpTransport::new(
            format!("{}/v2", server.url()),
            SecureString::new("secret-token"),
            Some(Duration::from_secs(5)),
        )
        .unwrap()
    }

    #[test]
    fn test_posts_query_with_raw_token() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/v2")
            .match_header("authorization", "secret-token")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "query": "{ boards { id name } }" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": {"boards": []}}"#)
            .create();

        let response = transport(&server).execute("{ boards { id name } }").unwrap();
        assert!(response.error_list().is_none());
        mock.assert();
    }

    #[test]
    fn test_unauthorized_without_errors_is_auth_error() {
        let mut server = Server::new();
        server
            .mock("POST", "/v2")
            .with_status(401)
            .with_body("{}")
            .create();

        let err = transport(&server).execute("{ boards { id } }").unwrap_err();
        assert!(matches!(err, ExportError::Auth(_)));
    }

    #[test]
    fn test_error_list_survives_non_success_status() {
        let mut server = Server::new();
        server
            .mock("POST", "/v2")
            .with_status(500)
            .with_body(r#"{"errors": [{"message": "Internal server error"}]}"#)
            .create();

        let response = transport(&server).execute("{ boards { id } }").unwrap();
        assert_eq!(response.error_list().unwrap().len(), 1);
    }

    #[test]
    fn test_non_json_error_body_maps_to_status() {
        let mut server = Server::new();
        server
            .mock("POST", "/v2")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create();

        let err = transport(&server).execute("{ boards { id } }").unwrap_err();
        assert!(matches!(err, ExportError::Http(ref msg) if msg.contains("502")));
    }
}
