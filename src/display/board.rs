//! Board list formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::BoardSummary;

#[derive(Tabled)]
struct BoardLine {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Export")]
    selected: String,
}

/// Format boards as a table, marking the one an export would pick
pub fn format_board_list(boards: &[BoardSummary], configured: Option<&str>) -> String {
    if boards.is_empty() {
        return "No boards found.".to_string();
    }

    // Only the first exact match is exported.
    let selected = configured.and_then(|name| boards.iter().position(|b| b.name == name));

    let lines = boards.iter().enumerate().map(|(i, b)| BoardLine {
        id: b.id.clone(),
        name: b.name.clone(),
        selected: if selected == Some(i) { "*".into() } else { String::new() },
    });

    let mut table = Table::new(lines);
    table.with(Style::rounded());
    format!("{}\n{} board(s)", table, boards.len())
}
