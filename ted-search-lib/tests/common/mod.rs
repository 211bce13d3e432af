#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use serde_json::json;
use ted_search_lib::ClientConfig;
use ted_search_lib::TedClient;
use ted_search_lib::api::query::SearchFacets;
use ted_search_lib::error::TransportError;
use ted_search_lib::retry::RetryConfig;
use ted_search_lib::transport::RequestAttempt;
use ted_search_lib::transport::Transport;
use ted_search_lib::transport::TransportResponse;
use tokio::time::Instant;

pub type Reply = Result<TransportResponse, TransportError>;

/// What the fake server saw for one attempt.
#[derive(Debug, Clone)]
pub struct Seen {
    pub index: u32,
    pub at: Instant,
    pub body: Value,
}

/// Transport that replays a fixed script of replies.
///
/// Once the script runs out, `fallback` is returned for every further attempt.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    seen: Mutex<Vec<Seen>>,
}

impl ScriptedTransport {
    pub fn new(script: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Self::with_fallback(script, Err(TransportError::protocol("script exhausted")))
    }

    pub fn with_fallback(script: impl IntoIterator<Item = Reply>, fallback: Reply) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.seen().into_iter().map(|s| s.body).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, attempt: &RequestAttempt<'_>) -> Result<TransportResponse, TransportError> {
        self.seen.lock().unwrap().push(Seen {
            index: attempt.index(),
            at: Instant::now(),
            body: attempt.template().body().cloned().unwrap_or(Value::Null),
        });
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

pub fn notices(range: std::ops::Range<usize>) -> Vec<Value> {
    range
        .map(|n| json!({"publication-number": format!("{:06}-2025", n), "title": {"eng": format!("Notice {}", n)}}))
        .collect()
}

/// An iteration batch with the given notices and optional next token.
pub fn batch(items: Vec<Value>, token: Option<&str>) -> Reply {
    let mut body = json!({ "notices": items });
    if let Some(token) = token {
        body["iterationNextToken"] = Value::from(token);
    }
    Ok(TransportResponse::ok(body))
}

pub fn status(code: u16) -> Reply {
    Err(TransportError::status(code, ""))
}

pub fn facets() -> SearchFacets {
    SearchFacets::builder(
        NaiveDate::from_ymd_opt(2025, 6, 18).unwrap(),
        NaiveDate::from_ymd_opt(2025, 9, 16).unwrap(),
    )
    .territories(["DE"])
    .subject_prefixes(["33*"])
    .build()
    .unwrap()
}

/// The default test facets, projected onto `fields` only.
pub fn facets_with_fields(fields: &[&str]) -> SearchFacets {
    SearchFacets::builder(
        NaiveDate::from_ymd_opt(2025, 6, 18).unwrap(),
        NaiveDate::from_ymd_opt(2025, 9, 16).unwrap(),
    )
    .territories(["DE"])
    .fields(fields)
    .build()
    .unwrap()
}

pub fn fast_retry() -> RetryConfig {
    RetryConfig::default()
        .base_delay(Duration::from_millis(10))
        .max_delay(Duration::from_millis(40))
}

pub fn client(transport: &Arc<ScriptedTransport>) -> TedClient {
    client_with(transport, ClientConfig::default().with_retry(fast_retry()))
}

pub fn client_with(transport: &Arc<ScriptedTransport>, config: ClientConfig) -> TedClient {
    TedClient::builder()
        .config(config)
        .transport(Arc::clone(transport))
        .build()
        .unwrap()
}
