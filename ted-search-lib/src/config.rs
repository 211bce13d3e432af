//! Client configuration

use std::time::Duration;

use crate::retry::RetryConfig;
use crate::transport::DEFAULT_TIMEOUT;

/// Search endpoint of the TED API v3.
pub const DEFAULT_ENDPOINT: &str = "https://api.ted.europa.eu/v3/notices/search";

/// Token parameter names tried in order when continuing an iteration.
pub const DEFAULT_TOKEN_PARAMS: &[&str] = &["page-token", "next-page-token", "iteration-token", "page"];

/// Process-wide settings for a [`TedClient`](crate::TedClient).
///
/// Built once before any fetch and never mutated afterwards; every fetch
/// reads it through a shared reference.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ted_search_lib::ClientConfig;
/// use ted_search_lib::retry::RetryConfig;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(30))
///     .with_retry(RetryConfig::default().max_attempts(3))
///     .with_batch_limit(100);
/// assert_eq!(config.batch_limit, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Search endpoint URL.
    pub endpoint: String,

    /// Per-attempt request timeout.
    ///
    /// Default: 20 seconds
    pub timeout: Duration,

    /// Backoff and attempt cap.
    pub retry: RetryConfig,

    /// Batch size for iteration mode.
    ///
    /// Default: 250
    pub batch_limit: u32,

    /// Candidate names for the continuation token request parameter.
    pub token_params: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
            batch_limit: 250,
            token_params: DEFAULT_TOKEN_PARAMS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl ClientConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the iteration batch size.
    pub fn with_batch_limit(mut self, limit: u32) -> Self {
        self.batch_limit = limit;
        self
    }

    /// Replaces the token parameter candidates.
    pub fn with_token_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.token_params = params.into_iter().map(Into::into).collect();
        self
    }
}
