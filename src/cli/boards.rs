//! CLI command for listing boards

use std::path::Path;

use super::load_settings;
use crate::config::read_api_token;
use crate::display::format_board_list;
use crate::error::ExportResult;
use crate::monday::{BoardFetcher, HttpTransport};

/// List every board the configured token can see
pub fn handle_boards_command(config: Option<&Path>) -> ExportResult<()> {
    let (_, settings) = load_settings(config)?;
    let token = read_api_token(&settings.api_token_path)?;
    let fetcher = BoardFetcher::new(HttpTransport::from_settings(&settings, token)?);

    let boards = fetcher.list_boards()?;
    println!("{}", format_board_list(&boards, Some(&settings.board_name)));

    Ok(())
}
