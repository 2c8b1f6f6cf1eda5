//! Page-cursor codec.
//!
//! A page cursor is an opaque, URL-safe token encoding the zero-based page
//! number: base64 (no padding) over the decimal representation. It is a
//! convenience token, not a security boundary: authorization is
//! re-evaluated on every request regardless of cursor content, so a forged
//! cursor can only select a different page of results the caller was going
//! to be allowed to see anyway.
//!
//! The encoding is a persisted contract: cursors are held by clients across
//! requests, so changing the format breaks previously issued cursors and
//! would require versioning.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use thiserror::Error;

/// Errors produced when decoding a page cursor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The token is not a valid encoding of a page number.
    #[error("malformed page cursor: {token}")]
    Malformed { token: String },
}

/// Encode a zero-based page number as an opaque cursor token.
pub fn encode_page(page: u64) -> String {
    URL_SAFE_NO_PAD.encode(page.to_string())
}

/// Decode a cursor token back to a page number.
///
/// An absent or empty token decodes to page 0 (the first page). Anything
/// else must be a token previously produced by [`encode_page`]; malformed
/// input is rejected with [`CursorError::Malformed`] rather than silently
/// treated as page 0.
pub fn decode_page(token: Option<&str>) -> Result<u64, CursorError> {
    let Some(token) = token else {
        return Ok(0);
    };
    if token.is_empty() {
        return Ok(0);
    }

    let malformed = || CursorError::Malformed {
        token: token.to_string(),
    };

    let bytes = URL_SAFE_NO_PAD.decode(token).map_err(|_| malformed())?;
    let text = std::str::from_utf8(&bytes).map_err(|_| malformed())?;
    text.parse::<u64>().map_err(|_| malformed())
}
