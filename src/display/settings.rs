//! Settings formatting

use std::path::Path;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;

#[derive(Tabled)]
struct SettingLine {
    #[tabled(rename = "Setting")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn line(key: &str, value: impl Into<String>) -> SettingLine {
    SettingLine {
        key: key.to_string(),
        value: value.into(),
    }
}

fn path_status(path: &Path) -> String {
    if path.is_file() {
        path.display().to_string()
    } else {
        format!("{} (missing)", path.display())
    }
}

/// Format effective settings as a two-column table
pub fn format_settings(settings: &Settings) -> String {
    let mut lines = vec![
        line("board_name", settings.board_name.clone()),
        line("output_format", settings.output_format.to_string()),
        line("api_token_path", path_status(&settings.api_token_path)),
        line("table_header_id", settings.table_header_id.clone()),
        line(
            "exclusion_list",
            if settings.exclusion_list.is_empty() {
                "(none)".to_string()
            } else {
                settings.exclusion_list.join(", ")
            },
        ),
        line("api_url", settings.api_url.clone()),
        line("page_size", settings.page_size.to_string()),
        line(
            "request_timeout_secs",
            settings
                .request_timeout_secs
                .map(|s| s.to_string())
                .unwrap_or_else(|| "(none)".to_string()),
        ),
    ];

    if let Some(credentials) = &settings.google_credentials {
        lines.push(line("google_credentials", path_status(credentials)));
    }
    if let Some(sheet) = &settings.google_sheet_name {
        lines.push(line("google_sheet_name", sheet.clone()));
    }

    let mut table = Table::new(lines);
    table.with(Style::rounded());
    table.to_string()
}
