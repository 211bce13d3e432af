//! Retry configuration for automatic request retry.

use std::time::Duration;

/// Configuration for automatic retry behavior.
///
/// Controls how transient failures (timeouts, connection failures, HTTP 429
/// and 5xx) are retried. Delays grow exponentially from `base_delay` by
/// `multiplier` and are capped at `max_delay`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ted_search_lib::retry::RetryConfig;
///
/// // Default configuration: 5 attempts, 1s, 2s, 4s, 8s between them
/// let config = RetryConfig::default();
/// assert_eq!(config.delay_for(3), Duration::from_secs(4));
///
/// // Custom configuration
/// let custom = RetryConfig::default()
///     .max_attempts(3)
///     .base_delay(Duration::from_millis(500))
///     .max_delay(Duration::from_secs(2));
///
/// // Single attempt, no retries
/// let no_retry = RetryConfig::no_retry();
/// assert_eq!(no_retry.max_attempts, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Growth factor applied to the delay on each further retry.
    pub multiplier: u32,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            multiplier: 2,
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    /// Creates a config that issues a single attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Sets the maximum number of attempts.
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Sets the delay before the first retry.
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the delay growth factor.
    pub fn multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the maximum delay between attempts.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Returns the delay to wait before retry number `retry` (1-based).
    ///
    /// Non-decreasing in `retry` and never above `max_delay`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(retry.saturating_sub(1));
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}
