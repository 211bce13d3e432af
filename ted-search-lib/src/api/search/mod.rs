//! Page-mode and iteration-mode retrieval.
//!
//! - [`PagedFetcher`] / [`Pages`] - explicit page number and size
//! - [`IterationFetcher`] - continuation-token driven, unbounded

mod cursor;
mod iteration;
mod paged;
mod wire;

pub use cursor::ContinuationToken;
pub use cursor::CursorAnomaly;
pub use cursor::FetchCursor;
pub use iteration::FetchState;
pub use iteration::IterationFetcher;
pub use iteration::KEPT_VIOLATIONS;
pub use paged::PagedFetcher;
pub use paged::Pages;
