//! Continuation token and iteration cursor.

use std::collections::HashSet;
use std::fmt;

use crate::error::ErrorKind;

/// Server-issued continuation token.
///
/// Opaque: the client never parses it, only echoes it back and compares it
/// with tokens seen earlier in the same fetch.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token text, as it must be sent back.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContinuationToken({} chars)", self.0.len())
    }
}

/// Iteration progress owned by a single fetch.
///
/// Moved into each step of the [`IterationFetcher`](super::IterationFetcher)
/// and handed back on success, so no step ever shares it.
#[derive(Debug, Clone, Default)]
pub struct FetchCursor {
    token: Option<ContinuationToken>,
    requests: u32,
    seen: HashSet<ContinuationToken>,
    token_param: usize,
}

impl FetchCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token to send with the next request; `None` before the first response.
    pub fn token(&self) -> Option<&ContinuationToken> {
        self.token.as_ref()
    }

    /// Number of logical requests issued so far.
    pub fn requests(&self) -> u32 {
        self.requests
    }

    /// Index of the token parameter name the server accepted.
    pub fn token_param(&self) -> usize {
        self.token_param
    }

    /// Returns `true` if `token` was already issued during this fetch.
    pub fn has_seen(&self, token: &ContinuationToken) -> bool {
        self.seen.contains(token)
    }

    pub(crate) fn record_request(&mut self) {
        self.requests += 1;
    }

    pub(crate) fn set_token_param(&mut self, index: usize) {
        self.token_param = index;
    }

    /// Moves the cursor to a fresh token.
    pub(crate) fn advance(&mut self, token: ContinuationToken) {
        self.seen.insert(token.clone());
        self.token = Some(token);
    }
}

/// A continuation token that came back a second time.
///
/// Ends the fetch cleanly instead of requesting the same batch forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorAnomaly {
    pub token: ContinuationToken,
    /// Request number at which the repeat was observed.
    pub request: u32,
}

impl CursorAnomaly {
    /// Always [`ErrorKind::CursorAnomaly`]; never fatal.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::CursorAnomaly
    }
}

impl fmt::Display for CursorAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "continuation token repeated at request {}",
            self.request
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_tracks_seen_tokens() {
        let mut cursor = FetchCursor::new();
        assert!(cursor.token().is_none());

        cursor.advance(ContinuationToken::new("T1"));
        cursor.advance(ContinuationToken::new("T2"));

        assert_eq!(cursor.token(), Some(&ContinuationToken::new("T2")));
        assert!(cursor.has_seen(&ContinuationToken::new("T1")));
        assert!(!cursor.has_seen(&ContinuationToken::new("T3")));
    }

    #[test]
    fn test_token_debug_hides_value() {
        let token = ContinuationToken::new("secret-ish");
        assert_eq!(format!("{:?}", token), "ContinuationToken(10 chars)");
    }

    #[test]
    fn test_anomaly_is_not_fatal() {
        let anomaly = CursorAnomaly {
            token: ContinuationToken::new("T1"),
            request: 3,
        };
        assert_eq!(anomaly.kind(), ErrorKind::CursorAnomaly);
        assert!(!anomaly.kind().is_fatal());
        assert_eq!(anomaly.to_string(), "continuation token repeated at request 3");
    }
}
