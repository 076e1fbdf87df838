//! Configuration module for monday-export
//!
//! This module provides configuration management including:
//! - The JSON export settings file
//! - Config file discovery and output file locations
//! - Zero-on-drop secrets

pub mod paths;
pub mod secret;
pub mod settings;

pub use paths::{resolve_config_path, OutputPaths};
pub use secret::{read_api_token, SecureString};
pub use settings::{OutputFormat, Settings};
