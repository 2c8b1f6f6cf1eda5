//! Search query types.

use serde::{Deserialize, Serialize};

/// Search query envelope.
///
/// One immutable query as submitted by a client. The gateway decides which
/// of the requested result kinds the caller may see, restricts the
/// underlying engine query accordingly, and filters individual hits.
///
/// # Semantics
///
/// - **`kinds`**: If `Some`, only these result kinds are searched. If
///   `None`, all kinds registered with the gateway are searched.
/// - **`filter`**: An engine-defined structured filter, passed through to
///   the underlying engine verbatim. The gateway does not interpret it.
/// - **`cursor`**: An opaque page cursor previously returned in a
///   [`ResultSet`](crate::ResultSet). Absent means the first page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text search term.
    pub term: String,

    /// Engine-defined structured filter (opaque to the gateway).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<serde_json::Value>,

    /// Result kinds to search. `None` means all registered kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<String>>,

    /// Opaque page cursor. Absent means page 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl SearchQuery {
    /// Create a query for the given search term.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            filter: None,
            kinds: None,
            cursor: None,
        }
    }

    /// Restrict the query to the given result kinds.
    pub fn with_kinds(mut self, kinds: Vec<String>) -> Self {
        self.kinds = Some(kinds);
        self
    }

    /// Attach an engine-defined structured filter.
    pub fn with_filter(mut self, filter: serde_json::Value) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the page cursor.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}
