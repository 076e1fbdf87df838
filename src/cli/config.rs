//! CLI command for showing the resolved configuration

use std::path::Path;

use super::load_settings;
use crate::display::format_settings;
use crate::error::ExportResult;

/// Print the config file location and its effective values
///
/// Secrets are never read here; only the paths that hold them are shown.
pub fn handle_config_command(config: Option<&Path>) -> ExportResult<()> {
    let (path, settings) = load_settings(config)?;

    println!("monday-export configuration");
    println!("===========================");
    println!("Config file: {}", path.display());
    println!();
    println!("{}", format_settings(&settings));

    Ok(())
}
