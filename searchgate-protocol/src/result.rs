//! Search result types.

use serde::{Deserialize, Serialize};

/// Authorization metadata attached to a document.
///
/// Carries the resource reference used to request a per-resource
/// authorization decision for documents of gated kinds. Documents without
/// this metadata cannot be checked at resource granularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAuthorization {
    /// Opaque resource reference, meaningful only to the authorizer.
    pub resource: String,
}

/// An indexed document as returned by the underlying engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Location of the document (e.g. a path or URL).
    pub location: String,

    /// Document title.
    pub title: String,

    /// Authorization metadata, if the document carries any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<DocumentAuthorization>,
}

impl Document {
    /// Create a document without authorization metadata.
    pub fn new(location: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            title: title.into(),
            authorization: None,
        }
    }

    /// Attach a resource reference for per-resource authorization.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.authorization = Some(DocumentAuthorization {
            resource: resource.into(),
        });
        self
    }
}

/// A single search hit.
///
/// Relevance rank is implied by position: engines return hits in descending
/// relevance order and the gateway preserves that order through filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The result kind this hit belongs to.
    pub kind: String,

    /// The matched document.
    pub document: Document,
}

impl SearchHit {
    /// Create a new search hit.
    pub fn new(kind: impl Into<String>, document: Document) -> Self {
        Self {
            kind: kind.into(),
            document,
        }
    }
}

/// One page of authorized search results.
///
/// Hits preserve the underlying engine's relevance order after filtering.
/// The page cursors are opaque tokens (see [`cursor`](crate::cursor));
/// `previous_page_cursor` is absent on the first page, and
/// `next_page_cursor` is absent when no further page is known to exist,
/// including when the gateway's latency budget ran out before it could
/// confirm one (a warning is attached in that case).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Authorized hits for the requested page.
    pub hits: Vec<SearchHit>,

    /// Cursor for the previous page, absent on page 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page_cursor: Option<String>,

    /// Cursor for the next page, absent when none is known to exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_cursor: Option<String>,

    /// Non-fatal warnings (e.g. the latency budget was exhausted).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Time taken to produce this page in milliseconds.
    pub took_ms: u64,
}

impl ResultSet {
    /// Create a result set with no cursors or warnings.
    pub fn new(hits: Vec<SearchHit>, took_ms: u64) -> Self {
        Self {
            hits,
            previous_page_cursor: None,
            next_page_cursor: None,
            warnings: Vec::new(),
            took_ms,
        }
    }

    /// Add a warning to the result set.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}
