//! Request payloads and tolerant response extraction.

use serde_json::Map;
use serde_json::Value;

use super::ContinuationToken;
use crate::api::query::QueryExpression;
use crate::api::query::SearchFacets;
use crate::error::TransportError;

const RESULT_KEYS: &[&str] = &["results", "items", "notices", "data"];
const TOTAL_KEYS: &[&str] = &["totalNoticeCount", "total", "totalResults"];
const HAS_MORE_KEYS: &[&str] = &["hasMore", "has-more"];
const TOKEN_KEYS: &[&str] = &[
    "iterationNextToken",
    "nextPageToken",
    "next-page-token",
    "iterationToken",
];
const NEXT_PAGE_KEYS: &[&str] = &["nextPage", "next-page"];
const NESTED_TOKEN_KEYS: &[&str] = &["token", "pageToken"];

/// Base request body shared by both retrieval modes.
pub(crate) fn search_body(query: &QueryExpression, facets: &SearchFacets, limit: u32) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("q".into(), Value::from(query.as_str()));
    body.insert("fields".into(), Value::from(facets.fields().join(",")));
    body.insert("limit".into(), Value::from(limit));
    body.insert("sort".into(), Value::from(facets.sort().field()));
    body.insert("order".into(), Value::from(facets.sort().direction().as_str()));
    body
}

/// The parts of a search response the fetchers care about.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SearchResponse {
    pub items: Vec<Value>,
    pub total: Option<u64>,
    pub has_more: Option<bool>,
    pub next_token: Option<ContinuationToken>,
}

impl SearchResponse {
    pub fn from_body(body: Value) -> Result<Self, TransportError> {
        let mut body = match body {
            Value::Object(map) => map,
            other => {
                return Err(TransportError::protocol(format!(
                    "expected a JSON object, got {}",
                    short(&other)
                )));
            }
        };

        let items = take_items(&mut body).unwrap_or_else(|| {
            log::debug!("response carries no notices array");
            Vec::new()
        });

        Ok(Self {
            items,
            total: TOTAL_KEYS.iter().find_map(|key| as_u64(body.get(*key))),
            has_more: HAS_MORE_KEYS
                .iter()
                .find_map(|key| body.get(*key).and_then(Value::as_bool)),
            next_token: extract_token(&body),
        })
    }
}

fn take_items(body: &mut Map<String, Value>) -> Option<Vec<Value>> {
    let key = RESULT_KEYS
        .iter()
        .find(|key| body.get(**key).is_some_and(Value::is_array))?;
    match body.remove(*key) {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    }
}

fn as_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn token_text(value: Option<&Value>) -> Option<ContinuationToken> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(ContinuationToken::new(s.as_str())),
        Value::Number(n) => Some(ContinuationToken::new(n.to_string())),
        _ => None,
    }
}

fn extract_token(body: &Map<String, Value>) -> Option<ContinuationToken> {
    TOKEN_KEYS
        .iter()
        .find_map(|key| token_text(body.get(*key)))
        .or_else(|| {
            let next_page = NEXT_PAGE_KEYS
                .iter()
                .find_map(|key| body.get(*key).and_then(Value::as_object))?;
            NESTED_TOKEN_KEYS
                .iter()
                .find_map(|key| token_text(next_page.get(*key)))
        })
}

fn short(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
