//! Path management for monday-export
//!
//! Resolves where the config file is read from and where file sinks write.
//!
//! ## Config Resolution Order
//!
//! 1. `--config` flag (or `MONDAY_EXPORT_CONFIG`, handled by clap)
//! 2. `./monday-data-export.conf`
//! 3. The per-user config directory (`~/.config/monday-export/` on Linux)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{ExportError, ExportResult};

/// Config file name looked up in the working and user config directories
pub const DEFAULT_CONFIG_FILE: &str = "monday-data-export.conf";

/// CSV sink output file
pub const CSV_FILE_NAME: &str = "monday_data.csv";

/// Workbook sink output file
pub const WORKBOOK_FILE_NAME: &str = "monday_data.xlsx";

/// Locate the config file to load
///
/// An explicit path is returned as-is so that a missing file surfaces as a
/// read error naming that path.
pub fn resolve_config_path(explicit: Option<&Path>) -> ExportResult<PathBuf> {
    let user_dir = ProjectDirs::from("com", "monday-export", "monday-export")
        .map(|dirs| dirs.config_dir().to_path_buf());
    resolve_config_path_in(explicit, Path::new("."), user_dir.as_deref())
}

fn resolve_config_path_in(
    explicit: Option<&Path>,
    working_dir: &Path,
    user_config_dir: Option<&Path>,
) -> ExportResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let mut searched = Vec::new();

    let local = working_dir.join(DEFAULT_CONFIG_FILE);
    if local.is_file() {
        return Ok(local);
    }
    searched.push(local);

    if let Some(dir) = user_config_dir {
        let user = dir.join(DEFAULT_CONFIG_FILE);
        if user.is_file() {
            return Ok(user);
        }
        searched.push(user);
    }

    let searched = searched
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(ExportError::Config(format!(
        "No config file found (searched: {})",
        searched
    )))
}

/// Output locations for the file-based sinks
#[derive(Debug, Clone)]
pub struct OutputPaths {
    output_dir: PathBuf,
}

impl OutputPaths {
    /// Write into `output_dir`, or the working directory when `None`
    pub fn new(output_dir: Option<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    /// Get the output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path to monday_data.csv
    pub fn csv_file(&self) -> PathBuf {
        self.output_dir.join(CSV_FILE_NAME)
    }

    /// Path to monday_data.xlsx
    pub fn workbook_file(&self) -> PathBuf {
        self.output_dir.join(WORKBOOK_FILE_NAME)
    }

    /// Create the output directory if needed
    pub fn ensure_output_dir(&self) -> ExportResult<()> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            ExportError::Io(format!(
                "Failed to create output directory {}: {}",
                self.output_dir.display(),
                e
            ))
        })
    }
}
