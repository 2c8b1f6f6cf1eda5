//! Underlying search engine contract.
//!
//! The engine owns indexing, query execution, relevance ranking, and its
//! own pagination. The gateway only narrows the searched kinds and walks
//! the engine's pages; the engine cursor is carried verbatim and never
//! interpreted.

use crate::error::Result;
use async_trait::async_trait;
use searchgate_protocol::SearchHit;

/// One fetch against the underlying engine.
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// Free-text search term.
    pub term: String,

    /// Engine-defined structured filter, passed through from the client
    /// query without interpretation.
    pub filter: Option<serde_json::Value>,

    /// Result kinds the engine may return. Already narrowed to the kinds
    /// the caller is allowed (or conditionally allowed) to see.
    pub kinds: Vec<String>,

    /// The engine's own pagination cursor from the previous page's
    /// response. `None` requests the first page. Opaque to the gateway.
    pub cursor: Option<String>,
}

/// One raw page of engine results.
#[derive(Debug, Clone)]
pub struct EnginePage {
    /// Raw hits in descending relevance order, not yet filtered.
    pub hits: Vec<SearchHit>,

    /// Cursor for the engine's next page, absent when the engine has no
    /// further pages.
    pub next_cursor: Option<String>,
}

/// Underlying search engine.
#[async_trait]
pub trait SearchEngine: std::fmt::Debug + Send + Sync {
    /// Fetch one page of raw candidate results.
    ///
    /// Implementations should construct failures with
    /// [`GatewayError::upstream`](crate::GatewayError::upstream).
    async fn fetch(&self, request: &EngineRequest) -> Result<EnginePage>;
}
