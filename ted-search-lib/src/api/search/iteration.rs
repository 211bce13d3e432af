//! Iteration-mode retrieval driven by continuation tokens.

use std::collections::VecDeque;

use futures::Stream;
use serde_json::Map;
use serde_json::Value;

use super::ContinuationToken;
use super::CursorAnomaly;
use super::FetchCursor;
use super::wire::SearchResponse;
use super::wire::search_body;
use crate::TedClient;
use crate::api::query::QueryExpression;
use crate::api::query::SearchFacets;
use crate::error::Error;
use crate::error::SchemaViolation;
use crate::model::NoticeRecord;
use crate::model::RecordValidator;
use crate::model::ValidatedPage;
use crate::transport::RequestTemplate;
use crate::transport::TransportResponse;

/// Most recent schema violations kept by an [`IterationFetcher`].
pub const KEPT_VIOLATIONS: usize = 256;

/// Lifecycle of an [`IterationFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    /// Nothing requested yet.
    Start,
    /// A request is in flight.
    Fetching,
    /// The last response carried a fresh token; more batches follow.
    Continuing,
    /// The server signalled the end, or a token repeated.
    Done,
    /// A fatal error ended the fetch.
    Failed,
}

impl FetchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// What follows a successfully fetched batch.
enum Transition {
    Continue(FetchCursor),
    Done(Option<CursorAnomaly>),
}

/// Lazy, forward-only sequence of notices over continuation tokens.
///
/// Each batch is requested only once the previous one has been drained, and
/// every record is validated before it is yielded. Records that fail
/// validation are logged and counted; the most recent [`KEPT_VIOLATIONS`] of
/// them are kept in [`violations`](Self::violations). They never end the
/// sequence. A fatal error is yielded once, after which
/// the sequence is exhausted; records already yielded stay valid.
///
/// Dropping the fetcher, or a pending [`next`](Self::next) call, simply stops
/// the fetch.
///
/// # Example
///
/// ```ignore
/// let mut notices = client.iterate(&facets);
///
/// while let Some(notice) = notices.next().await {
///     let notice = notice?;
///     println!("{:?}", notice.publication_number());
/// }
/// ```
pub struct IterationFetcher<'a> {
    client: &'a TedClient,
    query: QueryExpression,
    base: Map<String, Value>,
    validator: RecordValidator,
    cursor: Option<FetchCursor>,
    state: FetchState,
    buffer: VecDeque<NoticeRecord>,
    violations: Vec<SchemaViolation>,
    violation_count: u64,
    anomaly: Option<CursorAnomaly>,
    requests: u32,
    yielded: u64,
}

impl<'a> IterationFetcher<'a> {
    pub(crate) fn new(client: &'a TedClient, facets: &SearchFacets, batch_limit: u32) -> Self {
        let query = facets.expression();
        let base = search_body(&query, facets, batch_limit.max(1));
        Self {
            client,
            query,
            base,
            validator: client.validator_for(facets),
            cursor: Some(FetchCursor::new()),
            state: FetchState::Start,
            buffer: VecDeque::new(),
            violations: Vec::new(),
            violation_count: 0,
            anomaly: None,
            requests: 0,
            yielded: 0,
        }
    }

    pub fn query(&self) -> &QueryExpression {
        &self.query
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    /// Logical requests issued so far (token-parameter fallbacks not counted).
    pub fn requests(&self) -> u32 {
        self.requests
    }

    /// Records yielded so far.
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    /// The most recent records rejected by validation, oldest first.
    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }

    /// Records rejected by validation so far, including those no longer kept.
    pub fn violation_count(&self) -> u64 {
        self.violation_count
    }

    /// The repeated token that ended the fetch, if that is how it ended.
    pub fn cursor_anomaly(&self) -> Option<&CursorAnomaly> {
        self.anomaly.as_ref()
    }

    /// Yields the next validated notice.
    ///
    /// Returns `None` once the fetch is finished.
    pub async fn next(&mut self) -> Option<Result<NoticeRecord, Error>> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                self.yielded += 1;
                return Some(Ok(record));
            }

            if self.state.is_terminal() {
                return None;
            }

            let cursor = self.cursor.take()?;
            self.state = FetchState::Fetching;

            match self.step(cursor).await {
                Ok((page, transition)) => {
                    self.keep_violations(page.violations);
                    self.buffer.extend(page.records);
                    match transition {
                        Transition::Continue(cursor) => {
                            log::info!(
                                "continuing iteration after request {}",
                                cursor.requests()
                            );
                            self.cursor = Some(cursor);
                            self.state = FetchState::Continuing;
                        }
                        Transition::Done(anomaly) => {
                            self.anomaly = anomaly;
                            self.state = FetchState::Done;
                            log::info!(
                                "iteration completed after {} requests for {}",
                                self.requests,
                                self.query
                            );
                        }
                    }
                }
                Err(err) => {
                    self.state = FetchState::Failed;
                    log::warn!(
                        "iteration failed after {} records: {}",
                        self.yielded,
                        err
                    );
                    return Some(Err(err));
                }
            }
        }
    }

    /// Turns the fetcher into a `Stream` of notices.
    pub fn into_stream(self) -> impl Stream<Item = Result<NoticeRecord, Error>> + 'a {
        let mut fetcher = self;
        async_stream::stream! {
            while let Some(item) = fetcher.next().await {
                yield item;
            }
        }
    }

    /// Fetches one batch with `cursor` and decides what comes next.
    async fn step(&mut self, mut cursor: FetchCursor) -> Result<(ValidatedPage, Transition), Error> {
        cursor.record_request();
        self.requests = cursor.requests();

        let response = self.request(&mut cursor).await?;
        let response = SearchResponse::from_body(response.body)?;
        let returned = response.items.len();
        log::debug!(
            "request {}: {} notices, token present: {}",
            cursor.requests(),
            returned,
            response.next_token.is_some()
        );

        let page = self.validator.validate_page(response.items);

        let transition = match response.next_token {
            _ if returned == 0 => Transition::Done(None),
            None => Transition::Done(None),
            Some(token) if cursor.has_seen(&token) => {
                let anomaly = CursorAnomaly {
                    token,
                    request: cursor.requests(),
                };
                log::warn!("{}; ending iteration", anomaly);
                Transition::Done(Some(anomaly))
            }
            Some(token) => {
                cursor.advance(token);
                Transition::Continue(cursor)
            }
        };

        Ok((page, transition))
    }

    /// Issues the request for `cursor`, negotiating the token parameter name.
    ///
    /// The first request carries `page = 1` and no token. Later requests try
    /// the configured token parameter names in order, moving on only when
    /// the server rejects one with 400 or 422.
    async fn request(&self, cursor: &mut FetchCursor) -> Result<TransportResponse, Error> {
        let Some(token) = cursor.token().cloned() else {
            let mut body = self.base.clone();
            body.insert("page".into(), Value::from(1));
            return self.client.execute(&self.template(body)).await;
        };

        let params = &self.client.config().token_params;
        if params.is_empty() {
            return Err(Error::Config(
                "no continuation token parameter configured".to_string(),
            ));
        }

        let mut index = cursor.token_param().min(params.len() - 1);
        loop {
            let result = self
                .client
                .execute(&self.template(self.with_token(&params[index], &token)))
                .await;

            match result {
                Ok(response) => {
                    cursor.set_token_param(index);
                    return Ok(response);
                }
                Err(Error::Transport(err))
                    if matches!(err.status_code(), Some(400 | 422)) && index + 1 < params.len() =>
                {
                    log::debug!(
                        "token parameter '{}' rejected ({}), trying '{}'",
                        params[index],
                        err,
                        params[index + 1]
                    );
                    index += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn keep_violations(&mut self, violations: Vec<SchemaViolation>) {
        self.violation_count += violations.len() as u64;
        self.violations.extend(violations);
        let excess = self.violations.len().saturating_sub(KEPT_VIOLATIONS);
        self.violations.drain(..excess);
    }

    fn with_token(&self, param: &str, token: &ContinuationToken) -> Map<String, Value> {
        let mut body = self.base.clone();
        body.insert(param.to_string(), Value::from(token.as_str()));
        body
    }

    fn template(&self, body: Map<String, Value>) -> RequestTemplate {
        RequestTemplate::post_json(self.client.endpoint(), Value::Object(body))
    }
}
