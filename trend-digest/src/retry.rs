//! Retry policy with exponential backoff.
//!
//! The policy is a plain value wrapped around a call, so the transport retries
//! in acquisition and the whole-chain retry in summarization each count their
//! own attempts.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Maximum attempts, backoff shape and bounds for one kind of call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base: Duration,
    min: Duration,
    max: Duration,
}

impl RetryPolicy {
    /// Exponential backoff: `base * 2^(attempt - 1)` clamped into `[min, max]`.
    #[must_use]
    pub fn exponential(max_attempts: u32, base: Duration, min: Duration, max: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base,
            min: min.min(max),
            max,
        }
    }

    /// Three attempts, 1s base, waits between 2s and 10s.
    #[must_use]
    pub fn standard() -> Self {
        Self::exponential(
            3,
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(10),
        )
    }

    /// Two attempts, 1s base, waits between 1s and 5s.
    #[must_use]
    pub fn readme() -> Self {
        Self::exponential(
            2,
            Duration::from_secs(1),
            Duration::from_secs(1),
            Duration::from_secs(5),
        )
    }

    /// Constant delay between attempts.
    #[must_use]
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self::exponential(max_attempts, Duration::ZERO, delay, delay)
    }

    /// No waiting between attempts.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self::fixed(max_attempts, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to sleep after the given (1-based) failed attempt.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base.saturating_mul(factor).max(self.min).min(self.max)
    }

    /// Runs `operation` until it succeeds, the error is not retryable, or the
    /// attempt budget is spent. The last error is returned unchanged.
    pub async fn run<T, E, F, Fut, P>(
        &self,
        label: &str,
        mut operation: F,
        is_retryable: P,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= self.max_attempts || !is_retryable(&error) {
                        return Err(error);
                    }

                    let delay = self.delay_for(attempt);
                    warn!(
                        operation = label,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Retrying after failure"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::standard()
    }
}
