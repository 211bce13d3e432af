//! Facet error types

use chrono::NaiveDate;

/// Errors raised while assembling [`SearchFacets`](crate::api::query::SearchFacets).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FacetError {
    /// The date window is inverted.
    #[error("Invalid date window: {from} is after {to}")]
    InvalidWindow { from: NaiveDate, to: NaiveDate },

    /// A textual date is not `YYYY-MM-DD`.
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}
