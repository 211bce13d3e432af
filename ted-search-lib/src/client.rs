//! Main TedClient

use std::sync::Arc;

use crate::api::query::PageResult;
use crate::api::query::SearchFacets;
use crate::api::search::IterationFetcher;
use crate::api::search::PagedFetcher;
use crate::api::search::Pages;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::model::RecordSchema;
use crate::model::RecordValidator;
use crate::retry::RetryPolicy;
use crate::transport::HttpTransport;
use crate::transport::RequestTemplate;
use crate::transport::Transport;
use crate::transport::TransportResponse;

/// The main client for the TED notice search API.
///
/// This client is cheap to clone (uses `Arc` internally) and holds no
/// per-fetch state, so independent fetches can run concurrently.
///
/// # Example
///
/// ```ignore
/// use ted_search_lib::TedClient;
/// use ted_search_lib::api::query::SearchFacets;
///
/// let client = TedClient::builder().build()?;
/// let facets = SearchFacets::builder(from, to).territories(["DE"]).build()?;
///
/// let page = client.search_page(&facets, 1, 100).await?;
/// println!("{} of {:?}", page.len(), page.total());
/// ```
#[derive(Clone)]
pub struct TedClient {
    inner: Arc<TedClientInner>,
}

struct TedClientInner {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    validator: RecordValidator,
}

impl TedClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> TedClientBuilder {
        TedClientBuilder::new()
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Returns the search endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.inner.config.endpoint
    }

    /// Returns the validator configured on the client.
    ///
    /// Fetches apply it projected onto the fields they request; see
    /// [`validator_for`](Self::validator_for).
    pub fn validator(&self) -> &RecordValidator {
        &self.inner.validator
    }

    /// Returns the validator for records fetched with `facets`.
    pub fn validator_for(&self, facets: &SearchFacets) -> RecordValidator {
        RecordValidator::new(self.inner.validator.schema().project(facets.fields()))
    }

    /// Returns a page-mode fetcher.
    pub fn paged(&self) -> PagedFetcher<'_> {
        PagedFetcher::new(self)
    }

    /// Fetches a single page.
    pub async fn search_page(&self, facets: &SearchFacets, page: u32, page_size: u32) -> Result<PageResult, Error> {
        self.paged().fetch(facets, page, page_size).await
    }

    /// Walks pages starting at `start_page`.
    pub fn pages<'a>(&'a self, facets: &'a SearchFacets, start_page: u32, page_size: u32) -> Pages<'a> {
        PagedFetcher::new(self).pages(facets, start_page, page_size)
    }

    /// Iterates over every matching notice using the configured batch size.
    pub fn iterate(&self, facets: &SearchFacets) -> IterationFetcher<'_> {
        self.iterate_with_limit(facets, self.inner.config.batch_limit)
    }

    /// Iterates over every matching notice with an explicit batch size.
    pub fn iterate_with_limit(&self, facets: &SearchFacets, batch_limit: u32) -> IterationFetcher<'_> {
        IterationFetcher::new(self, facets, batch_limit)
    }

    /// Runs a request through the retry policy.
    pub(crate) async fn execute(&self, template: &RequestTemplate) -> Result<TransportResponse, Error> {
        self.inner
            .policy
            .run(self.inner.transport.as_ref(), template)
            .await
    }
}

/// Builder for constructing a [`TedClient`].
///
/// Without an explicit [`transport`](Self::transport), `build` creates an
/// [`HttpTransport`] using the configured timeout.
///
/// # Example
///
/// ```ignore
/// let client = TedClient::builder()
///     .config(ClientConfig::default().with_batch_limit(100))
///     .schema(RecordSchema::default().require("buyer-name", FieldKind::Text))
///     .build()?;
/// ```
pub struct TedClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    schema: RecordSchema,
}

impl TedClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            transport: None,
            schema: RecordSchema::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the search endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Sets a custom transport.
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Sets the record schema.
    pub fn schema(mut self, schema: RecordSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Builds the [`TedClient`].
    ///
    /// Fails if the endpoint is not an absolute URL or the HTTP client
    /// cannot be created.
    pub fn build(self) -> Result<TedClient, Error> {
        url::Url::parse(&self.config.endpoint)
            .map_err(|e| Error::Config(format!("invalid endpoint '{}': {}", self.config.endpoint, e)))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                HttpTransport::new(self.config.timeout)
                    .map_err(|e| Error::Config(format!("cannot create HTTP client: {}", e)))?,
            ),
        };

        Ok(TedClient {
            inner: Arc::new(TedClientInner {
                policy: RetryPolicy::new(self.config.retry.clone()),
                config: self.config,
                transport,
                validator: RecordValidator::new(self.schema),
            }),
        })
    }
}

impl Default for TedClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_endpoint() {
        let err = TedClient::builder().endpoint("not a url").build().err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_defaults() {
        let client = TedClient::builder().build().unwrap();
        assert_eq!(client.endpoint(), crate::config::DEFAULT_ENDPOINT);
        assert_eq!(client.config().batch_limit, 250);
    }
}
