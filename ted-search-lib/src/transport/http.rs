//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::RequestAttempt;
use super::Transport;
use super::TransportResponse;
use crate::error::TransportError;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// [`Transport`] over a shared `reqwest::Client`.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport with a fresh HTTP client.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        Ok(Self::with_client(client, timeout))
    }

    /// Creates a transport around an existing HTTP client.
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Returns the per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else {
            TransportError::from(err)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, attempt: &RequestAttempt<'_>) -> Result<TransportResponse, TransportError> {
        let template = attempt.template();
        log::debug!(
            "attempt {} {} {}",
            attempt.index(),
            template.method(),
            template.url()
        );

        let mut request = self
            .client
            .request(template.method().clone(), template.url())
            .headers(template.headers().clone())
            .timeout(self.timeout);

        if let Some(body) = template.body() {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(TransportError::status(status.as_u16(), text));
        }

        let body = serde_json::from_str(&text)
            .map_err(|e| TransportError::protocol(format!("invalid JSON body: {}", e)))?;

        Ok(TransportResponse::new(status.as_u16(), body))
    }
}
