//! Retry policy wrapping a [`Transport`].

use std::time::Duration;

use tokio::time::Instant;

use super::RetryConfig;
use crate::error::Error;
use crate::error::TransportError;
use crate::transport::RequestTemplate;
use crate::transport::Transport;
use crate::transport::TransportResponse;

/// Outcome of inspecting a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait `delay`, then issue the next attempt.
    Retry { delay: Duration },
    /// The failure is permanent; surface it as-is.
    Fail,
    /// The failure is transient but no attempts are left.
    Exhausted,
}

/// Runs a [`RequestTemplate`] through a [`Transport`] with exponential backoff.
///
/// The policy keeps no state between calls; the attempt counter lives on the
/// stack of [`run`](Self::run), so one policy can serve any number of
/// concurrent fetches.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Effective attempt cap (at least one attempt is always made).
    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts.max(1)
    }

    /// Decides what follows a failed attempt number `attempt` (1-based).
    pub fn decide(&self, error: &TransportError, attempt: u32) -> RetryDecision {
        if !error.is_retryable() {
            RetryDecision::Fail
        } else if attempt >= self.max_attempts() {
            RetryDecision::Exhausted
        } else {
            RetryDecision::Retry {
                delay: self.config.delay_for(attempt),
            }
        }
    }

    /// Executes the template until it succeeds, fails permanently, or the
    /// attempt cap is reached.
    pub async fn run<T>(&self, transport: &T, template: &RequestTemplate) -> Result<TransportResponse, Error>
    where
        T: Transport + ?Sized,
    {
        let started = Instant::now();
        let mut attempt = 1;

        loop {
            let result = transport
                .execute(&template.attempt(attempt, started.elapsed()))
                .await;

            let error = match result {
                Ok(response) => {
                    if attempt > 1 {
                        log::debug!("{} succeeded on attempt {}", template.url(), attempt);
                    }
                    return Ok(response);
                }
                Err(error) => error,
            };

            match self.decide(&error, attempt) {
                RetryDecision::Fail => return Err(Error::Transport(error)),
                RetryDecision::Exhausted => {
                    log::warn!(
                        "giving up on {} after {} attempts: {}",
                        template.url(),
                        attempt,
                        error
                    );
                    return Err(Error::RetryExhausted {
                        attempts: attempt,
                        last: error,
                    });
                }
                RetryDecision::Retry { delay } => {
                    log::warn!(
                        "attempt {}/{} failed: {}; retrying in {:?}",
                        attempt,
                        self.max_attempts(),
                        error,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
