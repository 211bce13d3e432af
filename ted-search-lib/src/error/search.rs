//! Crate-level error type

use super::FacetError;
use super::SchemaViolation;
use super::TransportError;

/// Errors surfaced by the search client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A non-retryable transport failure.
    #[error(transparent)]
    Transport(TransportError),

    /// Every allowed attempt failed with a transient error.
    #[error("Retries exhausted after {attempts} attempts: {last}")]
    RetryExhausted {
        /// Number of attempts issued.
        attempts: u32,
        /// The failure of the final attempt.
        last: TransportError,
    },

    /// The search facets are invalid.
    #[error(transparent)]
    Facets(#[from] FacetError),

    /// The client configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A single record failed validation.
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
}

/// Coarse classification of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Timeout, connection failure, 429 or 5xx. Recovered by retrying.
    TransientTransport,
    /// Any other HTTP status or a malformed body.
    PermanentTransport,
    /// All attempts were consumed.
    RetryExhausted,
    /// A single bad record. Never fatal to the fetch.
    SchemaViolation,
    /// A repeated continuation token. Ends the fetch as done.
    CursorAnomaly,
    /// Invalid facets or configuration supplied by the caller.
    Usage,
}

impl ErrorKind {
    /// Returns `true` if failures of this kind end a fetch with an error.
    pub fn is_fatal(self) -> bool {
        !matches!(self, Self::SchemaViolation | Self::CursorAnomaly)
    }
}

impl Error {
    /// Returns the failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(err) if err.is_retryable() => ErrorKind::TransientTransport,
            Self::Transport(_) => ErrorKind::PermanentTransport,
            Self::RetryExhausted { .. } => ErrorKind::RetryExhausted,
            Self::Schema(_) => ErrorKind::SchemaViolation,
            Self::Facets(_) | Self::Config(_) => ErrorKind::Usage,
        }
    }

    /// Returns `true` if this error ends the fetch it came from.
    pub fn is_fatal(&self) -> bool {
        self.kind().is_fatal()
    }

    /// Returns the HTTP status code behind this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport(err) | Self::RetryExhausted { last: err, .. } => err.status_code(),
            _ => None,
        }
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}
