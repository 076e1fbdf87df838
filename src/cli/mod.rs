//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the fetch and export layers.

pub mod boards;
pub mod config;
pub mod export;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{resolve_config_path, Settings};
use crate::error::ExportResult;

pub use boards::handle_boards_command;
pub use config::handle_config_command;
pub use export::{handle_export_command, run_export, ExportArgs, ExportSummary};

/// Resolve and load the config file, returning the path it came from
pub fn load_settings(explicit: Option<&Path>) -> ExportResult<(PathBuf, Settings)> {
    let path = resolve_config_path(explicit)?;
    debug!(path = %path.display(), "Loading config");
    let settings = Settings::load(&path)?;
    Ok((path, settings))
}
