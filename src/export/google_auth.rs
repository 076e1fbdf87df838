//! Google service-account authentication
//!
//! Exchanges a signed JWT assertion for an OAuth2 access token
//! (the "two-legged" service account flow).

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SecureString;
use crate::error::{ExportError, ExportResult};

/// Scopes requested for spreadsheet access and lookup by name
pub const SCOPES: [&str; 2] = [
    "https://spreadsheets.google.com/feeds",
    "https://www.googleapis.com/auth/drive",
];

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of a signed assertion; Google rejects anything over an hour
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Produces bearer tokens for Google APIs
pub trait AccessTokenSource {
    fn access_token(&self) -> ExportResult<SecureString>;
}

/// The fields of a service account JSON key file that the flow needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: SecureString,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Load a key file downloaded from the Google Cloud console
    pub fn from_file<P: AsRef<Path>>(path: P) -> ExportResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ExportError::Auth(format!(
                "Failed to read Google credentials {}: {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            ExportError::Auth(format!(
                "Invalid Google credentials {}: {}",
                path.display(),
                e
            ))
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Token source backed by a service account key
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    http: Client,
}

impl ServiceAccountTokenSource {
    pub fn new(key: ServiceAccountKey, http: Client) -> Self {
        Self { key, http }
    }

    /// Sign the RS256 assertion presented to the token endpoint
    pub fn assertion(&self, now: DateTime<Utc>) -> ExportResult<String> {
        let claims = Claims {
            iss: self.key.client_email.clone(),
            scope: SCOPES.join(" "),
            aud: self.key.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        Ok(encode(&header, &claims, &key)?)
    }
}

impl AccessTokenSource for ServiceAccountTokenSource {
    fn access_token(&self) -> ExportResult<SecureString> {
        let assertion = SecureString::new(self.assertion(Utc::now())?);
        debug!(client_email = %self.key.client_email, "Requesting Google access token");

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.expose())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExportError::Auth(format!(
                "Google token exchange failed (HTTP {}): {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json()?;
        Ok(SecureString::new(token.access_token))
    }
}
