//! Query construction for the notice search endpoint.
//!
//! # Types
//!
//! - [`SearchFacets`] - the independent filter dimensions of a search
//! - [`QueryExpression`] - the textual `q` expression built from facets
//! - [`Sort`] - ordering specification for results
//! - [`PageResult`] - one page of results in page mode

mod facets;
mod filter;
mod order;
mod page;

pub use facets::DEFAULT_FIELDS;
pub use facets::SearchFacets;
pub use facets::SearchFacetsBuilder;
pub use filter::QueryExpression;
pub use filter::build_expression;
pub use order::Direction;
pub use order::Sort;
pub use page::PageResult;
