//! Bounded retries with capped exponential backoff.
//!
//! Every error is retried except [`crate::error::ScraperError::Cancelled`]: a cancelled
//! token stays cancelled, so another attempt could only fail the same way.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::config::EngineConfig;
use crate::error::ScraperResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts including the first one; never below 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_attempts, config.backoff_base, config.backoff_cap)
    }

    /// Delay after failed attempt `attempt` (1-based): `min(base * 2^(attempt-1), cap)`.
    ///
    /// | failed attempt | delay (base 1s, cap 10s) |
    /// |----------------|--------------------------|
    /// | 1              | 1s                       |
    /// | 2              | 2s                       |
    /// | 3              | 4s                       |
    /// | 5              | 10s                      |
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay
            .checked_mul(1u32 << exponent)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// Runs `operation` until it succeeds or `policy.max_attempts` is used up.
///
/// The error of the final attempt is returned unchanged.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> ScraperResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ScraperResult<T>>,
{
    let mut attempt = 1u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if err.is_cancelled() || attempt >= policy.max_attempts {
            return Err(err);
        }

        let delay = policy.delay_after(attempt);
        warn!(
            attempt,
            max_attempts = policy.max_attempts,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "page operation failed - retrying after backoff"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
