//! Transport error types

use std::time::Duration;

/// Classified failure of a single request attempt.
///
/// Produced by a [`Transport`](crate::transport::Transport); the transport
/// itself never retries, [`RetryPolicy`](crate::retry::RetryPolicy) decides
/// what to do with each variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The attempt did not complete within the per-attempt timeout.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The connection could not be established or was dropped.
    #[error("Connection failure: {0}")]
    Connection(String),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body, possibly empty.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl TransportError {
    /// Creates a new HTTP status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates a new protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Returns the HTTP status code if this is a status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if a fresh attempt may succeed.
    ///
    /// Timeouts, connection failures, 429 and every 5xx are transient.
    /// Everything else, including malformed bodies, is permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connection(_) => true,
            Self::Status { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Protocol(_) => false,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Protocol(err.to_string())
        } else if let Some(status) = err.status() {
            Self::status(status.as_u16(), err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }
}
