//! Retry with exponential back-off, shared by every outbound HTTP client.
//!
//! Each client error type implements [`Retryable`] to say which failures are
//! transient (rate limits, 5xx, transport errors). [`RetryPolicy::run`]
//! retries only those, sleeping `base × 2ⁿ` between attempts, and returns the
//! last error once `max_retries` additional attempts have been spent.

use std::future::Future;
use std::time::Duration;

/// Classifies an error as transient (worth retrying) or permanent.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first; total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Delay before the first retry. Doubles on each subsequent retry.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Apply ±25 % jitter to each delay.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            jitter: false,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            ..Self::default()
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    #[must_use]
    pub fn with_jitter(mut self) -> Self {
        self.jitter = true;
        self
    }

    /// Un-jittered delay before retry number `retry` (1-based).
    ///
    /// With a 1 s base: 1 s, 2 s, 4 s, … capped at `max_delay`.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32 << retry.saturating_sub(1).min(20);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }

    /// Sum of every back-off sleep when all retries are spent.
    #[must_use]
    pub fn total_backoff(&self) -> Duration {
        (1..=self.max_retries).map(|n| self.delay_for(n)).sum()
    }

    /// Runs `operation`, retrying transient failures.
    ///
    /// `label` names the call site in retry warnings.
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable error, or the last retryable error once
    /// the retry budget is exhausted.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, E>
    where
        E: Retryable + std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut retry = 0u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !err.is_retryable() || retry >= self.max_retries {
                        return Err(err);
                    }
                    retry += 1;
                    let delay = self.jittered(self.delay_for(retry));
                    tracing::warn!(
                        call = label,
                        attempt = retry,
                        max_retries = self.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transient upstream error, retrying after back-off"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if !self.jitter || delay.is_zero() {
            return delay;
        }
        delay.mul_f64(rand::random::<f64>() * 0.5 + 0.75)
    }
}
