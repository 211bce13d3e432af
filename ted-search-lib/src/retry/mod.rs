//! Retry configuration and policy.

mod config;
mod policy;

pub use config::RetryConfig;
pub use policy::RetryDecision;
pub use policy::RetryPolicy;
