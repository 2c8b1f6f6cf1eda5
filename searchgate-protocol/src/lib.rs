//! Wire contract for the searchgate gateway.
//!
//! This crate defines the request and response types exchanged between a
//! client and the searchgate service, plus the page-cursor codec. These
//! types are used by:
//!
//! - The gateway service (`searchgate-service`)
//! - Transport layers embedding the gateway (HTTP servers, RPC handlers)
//! - Clients constructing queries and consuming result pages
//!
//! # Pagination Model
//!
//! Result delivery is page-based. A [`SearchQuery`] optionally carries an
//! opaque page cursor; the returned [`ResultSet`] carries cursors for the
//! previous and next page when those pages exist. Cursors are produced and
//! consumed by the [`cursor`] module and round-trip losslessly.
//!
//! # Example
//!
//! ```rust
//! use searchgate_protocol::SearchQuery;
//!
//! let query = SearchQuery::new("wireless headphones")
//!     .with_kinds(vec!["products".to_string()])
//!     .with_cursor(searchgate_protocol::cursor::encode_page(2));
//! ```

pub mod cursor;

mod query;
mod result;

pub use cursor::CursorError;
pub use query::SearchQuery;
pub use result::{Document, DocumentAuthorization, ResultSet, SearchHit};

/// Default number of authorized results per page.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Maximum allowed page size.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Default latency budget in milliseconds for one query's pagination loop.
pub const DEFAULT_BUDGET_MS: u64 = 1000;
