//! TED notice search client library
//!
//! A Rust async client for the TED Search API (v3): facet-driven query
//! expressions, page and iteration-token retrieval, retry with exponential
//! backoff and per-record schema validation.

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod retry;
pub mod transport;

mod client;

pub use client::*;
pub use config::ClientConfig;
pub use error::Error;
