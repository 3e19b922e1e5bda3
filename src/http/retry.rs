//! Retry policy for HTTP requests

use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;

/// Configuration for retry behavior.
///
/// Retries apply only to retryable failures (connection errors, timeouts,
/// 429 and 5xx responses); fatal failures are surfaced immediately.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the initial request
    pub max_retries: u32,

    /// Initial retry delay
    pub initial_interval: Duration,

    /// Maximum retry delay
    pub max_interval: Duration,

    /// Exponential backoff multiplier
    pub multiplier: f64,

    /// Randomization factor for jitter
    pub randomization_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(30),
            multiplier: 2.0,
            randomization_factor: 0.1,
        }
    }
}

impl RetryConfig {
    /// Create an exponential backoff schedule from this config.
    pub fn to_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_max_interval(self.max_interval)
            .with_multiplier(self.multiplier)
            .with_randomization_factor(self.randomization_factor)
            .with_max_elapsed_time(None)
            .build()
    }
}

/// Calculate the delay before the next attempt, or `None` when the error is
/// fatal or the attempt budget is spent.
///
/// A backend-provided `retry-after` takes precedence over the computed
/// backoff.
pub fn calculate_retry_delay(
    error: &crate::error::Error,
    attempt: u32,
    config: &RetryConfig,
) -> Option<Duration> {
    if !error.is_retryable() || attempt >= config.max_retries {
        return None;
    }

    if let Some(delay) = error.retry_after() {
        return Some(delay.min(config.max_interval));
    }

    let mut backoff = config.to_backoff();
    for _ in 0..attempt {
        backoff.next_backoff();
    }
    backoff.next_backoff()
}
