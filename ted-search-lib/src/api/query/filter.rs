//! Query expression building.
//!
//! Turns [`SearchFacets`] into the textual `q` parameter of the search API.
//! Clauses are emitted in a fixed order (period, territory, subject,
//! form type) and joined with `AND`, so equal facets always produce
//! byte-identical expressions.

use std::fmt;

use super::SearchFacets;

const PERIOD_FIELD: &str = "publication-date";
const PLACE_FIELD: &str = "place-of-performance.country";
const BUYER_COUNTRY_FIELD: &str = "buyer-country";
const CPV_FIELD: &str = "classification-cpv";
const TITLE_FIELD: &str = "title";
const FORM_TYPE_FIELD: &str = "form-type";

/// A search filter expression.
///
/// Opaque to the rest of the client; only its text is sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryExpression(String);

impl QueryExpression {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for QueryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QueryExpression {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Builds the query expression for a set of facets.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use ted_search_lib::api::query::{SearchFacets, build_expression};
///
/// let facets = SearchFacets::builder(
///     NaiveDate::from_ymd_opt(2025, 6, 18).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 9, 16).unwrap(),
/// )
/// .territories(["DE"])
/// .build()
/// .unwrap();
///
/// assert_eq!(
///     build_expression(&facets).as_str(),
///     "publication-date:[2025-06-18 TO 2025-09-16] \
///      AND (place-of-performance.country:DE OR buyer-country:DE)"
/// );
/// ```
pub fn build_expression(facets: &SearchFacets) -> QueryExpression {
    let mut clauses = vec![period_clause(facets)];
    clauses.extend(territory_clause(facets.territories()));
    clauses.extend(subject_clause(facets.subject_prefixes(), facets.keywords()));
    clauses.extend(form_type_clause(facets.form_types()));
    QueryExpression(clauses.join(" AND "))
}

fn period_clause(facets: &SearchFacets) -> String {
    format!(
        "{}:[{} TO {}]",
        PERIOD_FIELD,
        facets.date_from().format("%Y-%m-%d"),
        facets.date_to().format("%Y-%m-%d")
    )
}

fn territory_clause(codes: &[String]) -> Option<String> {
    if codes.is_empty() {
        return None;
    }
    let mut disjuncts: Vec<String> = codes
        .iter()
        .map(|code| format!("({}:{} OR {}:{})", PLACE_FIELD, code, BUYER_COUNTRY_FIELD, code))
        .collect();
    match disjuncts.len() {
        1 => disjuncts.pop(),
        _ => Some(format!("({})", disjuncts.join(" OR "))),
    }
}

/// CPV prefixes and title keywords; both parts are optional and joined with AND.
fn subject_clause(prefixes: &[String], keywords: &[String]) -> Option<String> {
    let mut parts = Vec::with_capacity(2);

    if !prefixes.is_empty() {
        let codes: Vec<String> = prefixes
            .iter()
            .map(|prefix| format!("{}:{}", CPV_FIELD, prefix))
            .collect();
        parts.push(format!("({})", codes.join(" OR ")));
    }

    if !keywords.is_empty() {
        let terms: Vec<String> = keywords.iter().map(|k| quote_keyword(k)).collect();
        parts.push(format!("{}:({})", TITLE_FIELD, terms.join(" OR ")));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" AND "))
    }
}

fn form_type_clause(codes: &[String]) -> Option<String> {
    if codes.is_empty() {
        return None;
    }
    Some(format!("{}:({})", FORM_TYPE_FIELD, codes.join(" OR ")))
}

fn quote_keyword(keyword: &str) -> String {
    if keyword.contains(char::is_whitespace) || keyword.contains(':') {
        format!("\"{}\"", keyword)
    } else {
        keyword.to_string()
    }
}
