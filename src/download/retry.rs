//! Retry policy.
//!
//! Backoff is computed here as plain durations; the waiting itself is left to
//! `tokio_retry`, which consumes `RetryPolicy::delays()` as its strategy.

use std::time::Duration;

/// Bounded exponential backoff.
///
/// After the `n`-th failed attempt the engine waits `base * 2^n`, capped at
/// `max_delay`. With the defaults (3 attempts, 1s base) that is 2s, then 4s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` counts the first attempt and is at
    /// least 1.
    pub fn new(max_attempts: usize, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// Total attempts, including the first.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Delay after `failed_attempts` failures (1-based).
    pub fn delay_for(&self, failed_attempts: usize) -> Duration {
        let exponent = u32::try_from(failed_attempts).unwrap_or(u32::MAX).min(31);
        let factor = 1_u32 << exponent;
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }

    /// Delays between attempts; `max_attempts - 1` of them.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let policy = *self;
        (1..policy.max_attempts).map(move |n| policy.delay_for(n))
    }
}
