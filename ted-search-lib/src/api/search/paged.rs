//! Page-mode retrieval.

use serde_json::Value;

use super::wire::SearchResponse;
use super::wire::search_body;
use crate::TedClient;
use crate::api::query::PageResult;
use crate::api::query::SearchFacets;
use crate::error::Error;
use crate::transport::RequestTemplate;

/// Fetches single pages by explicit number and size.
///
/// Stateless between calls: each [`fetch`](Self::fetch) is one
/// retry-wrapped request.
#[derive(Clone, Copy)]
pub struct PagedFetcher<'a> {
    client: &'a TedClient,
}

impl<'a> PagedFetcher<'a> {
    pub(crate) fn new(client: &'a TedClient) -> Self {
        Self { client }
    }

    /// Fetches page `page` (1-based) of `page_size` records.
    ///
    /// Zero values for `page` or `page_size` are raised to 1.
    pub async fn fetch(&self, facets: &SearchFacets, page: u32, page_size: u32) -> Result<PageResult, Error> {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let query = facets.expression();
        log::info!("requesting page {} (size {}) for {}", page, page_size, query);

        let mut body = search_body(&query, facets, page_size);
        body.insert("page".into(), Value::from(page));
        let template = RequestTemplate::post_json(self.client.endpoint(), Value::Object(body));

        let response = self.client.execute(&template).await?;
        let response = SearchResponse::from_body(response.body)?;
        let returned = response.items.len();
        let has_more = has_more(&response, page, page_size, returned);
        let validated = self.client.validator_for(facets).validate_page(response.items);
        log::debug!(
            "page {}: {} returned, {} valid, total {:?}, more: {}",
            page,
            returned,
            validated.records.len(),
            response.total,
            has_more
        );

        Ok(PageResult {
            query,
            facets: facets.clone(),
            page,
            page_size,
            records: validated.records,
            violations: validated.violations,
            returned,
            total: response.total,
            has_more,
            next_token: response.next_token,
        })
    }

    /// Walks pages from `start_page` until the server reports no more.
    pub fn pages(&self, facets: &'a SearchFacets, start_page: u32, page_size: u32) -> Pages<'a> {
        Pages {
            fetcher: *self,
            facets,
            next_page: start_page.max(1),
            page_size,
            remaining: None,
            done: false,
        }
    }
}

/// Explicit flag, then total count, then token presence, then a full page.
fn has_more(response: &SearchResponse, page: u32, page_size: u32, returned: usize) -> bool {
    if let Some(flag) = response.has_more {
        return flag;
    }
    if let Some(total) = response.total {
        let seen = u64::from(page - 1) * u64::from(page_size) + returned as u64;
        return seen < total;
    }
    if response.next_token.is_some() {
        return true;
    }
    returned > 0 && returned as u64 >= u64::from(page_size)
}

/// Async iterator over successive pages.
///
/// Stops after a page with `has_more == false`, an empty page, an error, or
/// once [`max_pages`](Self::max_pages) pages were yielded.
///
/// # Example
///
/// ```ignore
/// let mut pages = client.pages(&facets, 1, 100).max_pages(10);
///
/// while let Some(page) = pages.next().await {
///     let page = page?;
///     for record in page.records() {
///         println!("{:?}", record.publication_number());
///     }
/// }
/// ```
pub struct Pages<'a> {
    fetcher: PagedFetcher<'a>,
    facets: &'a SearchFacets,
    next_page: u32,
    page_size: u32,
    remaining: Option<u32>,
    done: bool,
}

impl<'a> Pages<'a> {
    /// Limits the number of pages fetched.
    pub fn max_pages(mut self, count: u32) -> Self {
        self.remaining = Some(count);
        self
    }

    /// Fetches the next page of results.
    ///
    /// Returns `None` when all pages have been consumed.
    pub async fn next(&mut self) -> Option<Result<PageResult, Error>> {
        if self.done || self.remaining == Some(0) {
            return None;
        }

        let result = self
            .fetcher
            .fetch(self.facets, self.next_page, self.page_size)
            .await;

        match &result {
            Ok(page) => {
                if !page.has_more() || page.returned() == 0 {
                    self.done = true;
                }
                self.next_page = self.next_page.saturating_add(1);
                if let Some(remaining) = self.remaining.as_mut() {
                    *remaining -= 1;
                }
            }
            Err(_) => self.done = true,
        }

        Some(result)
    }
}
