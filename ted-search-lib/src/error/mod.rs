//! Error types

mod facet;
mod schema;
mod search;
mod transport;

pub use facet::*;
pub use schema::*;
pub use search::*;
pub use transport::*;
