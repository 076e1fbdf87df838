//! Secret handling for API tokens and private keys
//!
//! Secrets are wiped from memory on drop and never printed.

use std::fmt;
use std::ops::Deref;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{ExportError, ExportResult};

/// A string that zeroes its contents on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureString {
    inner: String,
}

impl SecureString {
    /// Create a new SecureString
    pub fn new(s: impl Into<String>) -> Self {
        Self { inner: s.into() }
    }

    /// Get the string contents
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Get the length
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Deref for SecureString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecureString::new)
    }
}

// Don't print the contents in Debug output
impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("len", &self.inner.len())
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED {} bytes]", self.inner.len())
    }
}

/// Read an API token from a plaintext file, trimming surrounding whitespace
///
/// An empty file is an authentication error.
pub fn read_api_token<P: AsRef<Path>>(path: P) -> ExportResult<SecureString> {
    let path = path.as_ref();
    let mut contents = std::fs::read_to_string(path).map_err(|e| {
        ExportError::Auth(format!(
            "Failed to read API token file {}: {}",
            path.display(),
            e
        ))
    })?;

    let token = SecureString::new(contents.trim());
    contents.zeroize();

    if token.is_empty() {
        return Err(ExportError::Auth(format!(
            "API token file {} is empty",
            path.display()
        )));
    }

    Ok(token)
}
