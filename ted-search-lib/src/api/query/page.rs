//! Page type for page-mode results.

use serde_json::Value;
use serde_json::json;

use super::QueryExpression;
use super::SearchFacets;
use crate::api::search::ContinuationToken;
use crate::error::SchemaViolation;
use crate::model::NoticeRecord;

/// One page of search results.
///
/// Holds no reference back to the fetcher; advancing to the next page is
/// the caller's decision, guided by [`has_more`](Self::has_more).
///
/// # Example
///
/// ```ignore
/// let page = client.search_page(&facets, 1, 100).await?;
///
/// for record in page.records() {
///     println!("{:?}", record.publication_number());
/// }
///
/// if page.has_more() {
///     let next = client.search_page(&facets, page.page() + 1, 100).await?;
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub(crate) query: QueryExpression,
    pub(crate) facets: SearchFacets,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
    pub(crate) records: Vec<NoticeRecord>,
    pub(crate) violations: Vec<SchemaViolation>,
    /// Items the server returned, valid or not.
    pub(crate) returned: usize,
    pub(crate) total: Option<u64>,
    pub(crate) has_more: bool,
    pub(crate) next_token: Option<ContinuationToken>,
}

impl PageResult {
    /// The expression the page was requested with.
    pub fn query(&self) -> &QueryExpression {
        &self.query
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns a reference to the validated records in this page.
    pub fn records(&self) -> &[NoticeRecord] {
        &self.records
    }

    /// Consumes the page and returns the records.
    pub fn into_records(self) -> Vec<NoticeRecord> {
        self.records
    }

    /// Records of this page that failed validation.
    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }

    /// Number of items the server returned, including rejected ones.
    pub fn returned(&self) -> usize {
        self.returned
    }

    /// Total number of matches reported by the server, if any.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Returns `true` if a further page is expected.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Continuation token the server attached to this page, if any.
    pub fn next_token(&self) -> Option<&ContinuationToken> {
        self.next_token.as_ref()
    }

    /// Returns `true` if this page has no validated records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of validated records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// JSON document describing the page, as written by page-mode sinks.
    pub fn to_document(&self) -> Value {
        json!({
            "query": self.query.as_str(),
            "page": self.page,
            "limit": self.page_size,
            "count": self.records.len(),
            "total": self.total,
            "fields": self.facets.fields(),
            "sort_field": self.facets.sort().field(),
            "sort_order": self.facets.sort().direction().as_str(),
            "notices": self.records,
            "next_page_token": self.next_token.as_ref().map(ContinuationToken::as_str),
        })
    }
}
