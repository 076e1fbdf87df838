//! monday-export - Monday.com board exporter
//!
//! This library fetches every item of one Monday.com board through the
//! GraphQL API and writes it to a CSV file, an Excel workbook, or the
//! first sheet of a Google spreadsheet.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Config file, discovery paths, and secret handling
//! - `error`: Custom error types
//! - `models`: Board, item, and row types
//! - `monday`: GraphQL queries, transport, and the paginated fetcher
//! - `services`: Row normalization (header dedup and exclusions)
//! - `export`: CSV, workbook, and Google Sheets sinks
//! - `cli`: Command handlers
//! - `display`: Table formatting for terminal output
//!
//! # Example
//!
//! ```rust,ignore
//! use monday_export::config::{read_api_token, Settings};
//! use monday_export::monday::{BoardFetcher, HttpTransport};
//! use monday_export::services::Normalizer;
//!
//! let settings = Settings::load("monday-data-export.conf")?;
//! let token = read_api_token(&settings.api_token_path)?;
//! let mut fetcher = BoardFetcher::new(HttpTransport::from_settings(&settings, token)?);
//! let board = fetcher.fetch_board(&settings.board_name)?;
//! let table = Normalizer::from_settings(&settings).normalize(&board.items)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod monday;
pub mod services;

pub use error::{ExportError, ExportResult};
