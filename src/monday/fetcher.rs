//! Board fetcher
//!
//! Resolves a board name to its ID, then walks the cursor-paginated item
//! list, accumulating every item and the board's column metadata.
//!
//! ```text
//! Idle -> DiscoveringBoard -> FetchingFirstPage -> FetchingNextPage* -> Done
//!              |                    |                    |
//!              +------> Failed <----+      (API error) --+--> Done (partial)
//! ```
//!
//! A GraphQL error list on a continuation page ends pagination and keeps
//! the items gathered so far; the same error during discovery or on the
//! first page fails the whole fetch.

use tracing::{debug, info, warn};

use super::client::GraphQlTransport;
use super::queries::{boards_query, first_page_query, next_page_query};
use super::response::{BoardsData, FirstPageData, ItemsPage, NextPageData};
use crate::config::settings::DEFAULT_PAGE_SIZE;
use crate::error::{ExportError, ExportResult};
use crate::models::{BoardData, BoardSummary};

/// Boards requested per discovery page
const BOARDS_PAGE_SIZE: u32 = 100;

/// Where the fetcher is in the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    DiscoveringBoard,
    FetchingFirstPage,
    /// 1-based page number being requested (the first page is 1)
    FetchingNextPage { page: usize },
    Done,
    Failed,
}

/// Fetches a whole board through a [`GraphQlTransport`]
pub struct BoardFetcher<T: GraphQlTransport> {
    transport: T,
    page_size: u32,
    state: FetchState,
}

impl<T: GraphQlTransport> BoardFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            page_size: DEFAULT_PAGE_SIZE,
            state: FetchState::Idle,
        }
    }

    /// Set the number of items requested per page
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn transition(&mut self, next: FetchState) {
        debug!(from = ?self.state, to = ?next, "Fetcher state change");
        self.state = next;
    }

    /// List every board visible to the token
    ///
    /// The API caps each `boards` response, so pages are requested until
    /// one comes back short.
    pub fn list_boards(&self) -> ExportResult<Vec<BoardSummary>> {
        let mut boards = Vec::new();
        let mut page = 1;

        loop {
            let query = boards_query(BOARDS_PAGE_SIZE, page);
            let data: BoardsData = self.transport.execute(&query)?.into_data()?;
            let count = data.boards.len();
            boards.extend(data.boards);

            if count < BOARDS_PAGE_SIZE as usize {
                break;
            }
            debug!(page, boards = boards.len(), "Requesting next board page");
            page += 1;
        }

        Ok(boards)
    }

    /// Fetch all items and columns of the board named `board_name`
    pub fn fetch_board(&mut self, board_name: &str) -> ExportResult<BoardData> {
        match self.fetch_board_inner(board_name) {
            Ok(data) => {
                self.transition(FetchState::Done);
                Ok(data)
            }
            Err(e) => {
                self.transition(FetchState::Failed);
                Err(e)
            }
        }
    }

    fn fetch_board_inner(&mut self, board_name: &str) -> ExportResult<BoardData> {
        self.transition(FetchState::DiscoveringBoard);
        let board = find_board(self.list_boards()?, board_name)?;
        info!(board_id = %board.id, board_name = %board.name, "Found board");

        self.transition(FetchState::FetchingFirstPage);
        let query = first_page_query(&board.id, self.page_size);
        let data: FirstPageData = self.transport.execute(&query)?.into_data()?;
        let first = data
            .boards
            .into_iter()
            .next()
            .ok_or_else(|| ExportError::board_not_found(board_name))?;

        let columns = first.columns;
        let mut items = first.items_page.items;
        let mut cursor = non_empty(first.items_page.cursor);
        let mut page = 1;
        let mut truncated = false;
        info!(page, items = items.len(), "Fetched first page");

        while let Some(current) = cursor.take() {
            page += 1;
            self.transition(FetchState::FetchingNextPage { page });

            match self.fetch_next_page(&current) {
                Ok(next) => {
                    info!(page, items = next.items.len(), "Fetched page");
                    items.extend(next.items);
                    cursor = non_empty(next.cursor);
                }
                Err(ExportError::Api { messages }) => {
                    warn!(
                        page,
                        kept = items.len(),
                        errors = %messages.join("; "),
                        "Stopping pagination early after API error"
                    );
                    truncated = true;
                }
                Err(e) => return Err(e),
            }
        }

        info!(total_items = items.len(), columns = columns.len(), "Board fetch complete");

        Ok(BoardData {
            board_id: board.id,
            board_name: board.name,
            columns,
            items,
            truncated,
        })
    }

    fn fetch_next_page(&self, cursor: &str) -> ExportResult<ItemsPage> {
        let query = next_page_query(cursor, self.page_size);
        let data: NextPageData = self.transport.execute(&query)?.into_data()?;
        Ok(data.next_items_page)
    }
}

/// First board whose name matches exactly
pub fn find_board(boards: Vec<BoardSummary>, board_name: &str) -> ExportResult<BoardSummary> {
    boards
        .into_iter()
        .find(|b| b.name == board_name)
        .ok_or_else(|| ExportError::board_not_found(board_name))
}

fn non_empty(cursor: Option<String>) -> Option<String> {
    cursor.filter(|c| !c.is_empty())
}
