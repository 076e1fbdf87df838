//! Monday.com GraphQL client
//!
//! - `queries`: query text for board discovery and item pages
//! - `response`: the `data`/`errors` envelope and payload shapes
//! - `client`: the transport seam and its blocking HTTP implementation
//! - `fetcher`: the paginated board fetch

pub mod client;
pub mod fetcher;
pub mod queries;
pub mod response;

pub use client::{GraphQlTransport, HttpTransport};
pub use fetcher::{BoardFetcher, FetchState};
pub use response::{GraphQlError, GraphQlResponse};
