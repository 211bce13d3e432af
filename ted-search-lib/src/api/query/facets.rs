//! Search facets.

use chrono::NaiveDate;

use super::QueryExpression;
use super::Sort;
use super::build_expression;
use crate::error::FacetError;

/// Projection used when the caller does not name any fields.
pub const DEFAULT_FIELDS: &[&str] = &[
    "publication-number",
    "title",
    "buyer-name",
    "publication-date",
    "classification-cpv",
    "place-of-performance.country",
];

/// The independent filter dimensions of one search.
///
/// Immutable once built. Every list is trimmed, stripped of blanks and
/// de-duplicated (first occurrence wins, insertion order is kept); territory
/// and form-type codes are upper-cased.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use ted_search_lib::api::query::SearchFacets;
///
/// let facets = SearchFacets::builder(
///     NaiveDate::from_ymd_opt(2025, 6, 18).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 9, 16).unwrap(),
/// )
/// .territories(["de", "FR", "de"])
/// .subject_prefixes(["33*"])
/// .build()
/// .unwrap();
///
/// assert_eq!(facets.territories(), ["DE", "FR"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchFacets {
    date_from: NaiveDate,
    date_to: NaiveDate,
    territories: Vec<String>,
    subject_prefixes: Vec<String>,
    keywords: Vec<String>,
    form_types: Vec<String>,
    fields: Vec<String>,
    sort: Sort,
}

impl SearchFacets {
    /// Starts a builder for the inclusive window `date_from..=date_to`.
    pub fn builder(date_from: NaiveDate, date_to: NaiveDate) -> SearchFacetsBuilder {
        SearchFacetsBuilder::new(date_from, date_to)
    }

    pub fn date_from(&self) -> NaiveDate {
        self.date_from
    }

    pub fn date_to(&self) -> NaiveDate {
        self.date_to
    }

    /// ISO alpha-2 country codes.
    pub fn territories(&self) -> &[String] {
        &self.territories
    }

    /// CPV code prefixes, wildcards allowed.
    pub fn subject_prefixes(&self) -> &[String] {
        &self.subject_prefixes
    }

    /// Title keywords.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// eForms form-type codes.
    pub fn form_types(&self) -> &[String] {
        &self.form_types
    }

    /// Projected fields. Never empty.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    /// Builds the query expression for these facets.
    pub fn expression(&self) -> QueryExpression {
        build_expression(self)
    }
}

/// Builder for [`SearchFacets`].
#[derive(Debug, Clone)]
pub struct SearchFacetsBuilder {
    date_from: NaiveDate,
    date_to: NaiveDate,
    territories: Vec<String>,
    subject_prefixes: Vec<String>,
    keywords: Vec<String>,
    form_types: Vec<String>,
    fields: Vec<String>,
    sort: Sort,
}

impl SearchFacetsBuilder {
    fn new(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            date_from,
            date_to,
            territories: Vec::new(),
            subject_prefixes: Vec::new(),
            keywords: Vec::new(),
            form_types: Vec::new(),
            fields: Vec::new(),
            sort: Sort::default(),
        }
    }

    /// Starts a builder from `YYYY-MM-DD` strings.
    pub fn parse_window(date_from: &str, date_to: &str) -> Result<Self, FacetError> {
        Ok(Self::new(parse_date(date_from)?, parse_date(date_to)?))
    }

    /// Adds territory codes.
    pub fn territories<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for code in codes {
            push_unique(&mut self.territories, code.as_ref().trim().to_ascii_uppercase());
        }
        self
    }

    /// Adds subject-code prefixes.
    pub fn subject_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for prefix in prefixes {
            push_unique(&mut self.subject_prefixes, prefix.as_ref().trim().to_string());
        }
        self
    }

    /// Adds title keywords.
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in keywords {
            push_unique(&mut self.keywords, keyword.as_ref().trim().to_string());
        }
        self
    }

    /// Adds form-type codes.
    pub fn form_types<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for code in codes {
            push_unique(&mut self.form_types, code.as_ref().trim().to_ascii_uppercase());
        }
        self
    }

    /// Adds projected fields. An empty projection falls back to [`DEFAULT_FIELDS`].
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for field in fields {
            push_unique(&mut self.fields, field.as_ref().trim().to_string());
        }
        self
    }

    /// Sets the result ordering.
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Builds the facets, checking the date window.
    pub fn build(self) -> Result<SearchFacets, FacetError> {
        if self.date_from > self.date_to {
            return Err(FacetError::InvalidWindow {
                from: self.date_from,
                to: self.date_to,
            });
        }

        let fields = if self.fields.is_empty() {
            DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect()
        } else {
            self.fields
        };

        Ok(SearchFacets {
            date_from: self.date_from,
            date_to: self.date_to,
            territories: self.territories,
            subject_prefixes: self.subject_prefixes,
            keywords: self.keywords,
            form_types: self.form_types,
            fields,
            sort: self.sort,
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, FacetError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| FacetError::InvalidDate(value.to_string()))
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !value.is_empty() && !list.contains(&value) {
        list.push(value);
    }
}
