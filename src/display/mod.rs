//! Display formatting for terminal output
//!
//! Renders boards and settings as tables for the `boards` and `config`
//! commands.

pub mod board;
pub mod settings;

pub use board::format_board_list;
pub use settings::format_settings;
