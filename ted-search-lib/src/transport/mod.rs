//! Single-attempt request execution.
//!
//! A [`Transport`] runs exactly one HTTP exchange and classifies the outcome.
//! Retrying is left to [`RetryPolicy`](crate::retry::RetryPolicy), so tests can
//! swap in a scripted transport without touching the network.

mod http;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;

use crate::error::TransportError;

pub use http::DEFAULT_TIMEOUT;
pub use http::HttpTransport;

/// Executes one request attempt.
///
/// Implementations must not retry internally and must apply their own
/// per-attempt timeout.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the attempt and returns the decoded JSON body of a 2xx response.
    async fn execute(&self, attempt: &RequestAttempt<'_>) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, attempt: &RequestAttempt<'_>) -> Result<TransportResponse, TransportError> {
        (**self).execute(attempt).await
    }
}

/// Everything needed to issue a logical request, reused across attempts.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<serde_json::Value>,
}

impl RequestTemplate {
    /// Creates a template with `Accept: application/json` preset.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        Self {
            method,
            url: url.into(),
            headers,
            body: None,
        }
    }

    /// Creates a `POST` template carrying a JSON body.
    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::POST, url).with_body(body)
    }

    /// Sets the JSON body.
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds or replaces a header. Invalid values are ignored.
    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Binds the template to an attempt number.
    pub fn attempt(&self, index: u32, elapsed: Duration) -> RequestAttempt<'_> {
        RequestAttempt {
            template: self,
            index,
            elapsed,
        }
    }
}

/// One try of a [`RequestTemplate`].
#[derive(Debug, Clone, Copy)]
pub struct RequestAttempt<'a> {
    template: &'a RequestTemplate,
    index: u32,
    elapsed: Duration,
}

impl<'a> RequestAttempt<'a> {
    /// The template being attempted.
    pub fn template(&self) -> &'a RequestTemplate {
        self.template
    }

    /// 1-based attempt number.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Time spent on this logical request before the attempt started.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// A successful response with its decoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl TransportResponse {
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// Shorthand for a `200 OK` response.
    pub fn ok(body: serde_json::Value) -> Self {
        Self::new(200, body)
    }
}
