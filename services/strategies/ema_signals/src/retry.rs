//! Retry policy for the polling loop
//!
//! A failed cycle waits `delay(consecutive_failures)` before the loop moves on.
//! With `max_consecutive_failures` unset the loop never gives up.

use std::time::Duration;

/// How long to wait after a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay after every failure
    Fixed(Duration),
    /// `base * 2^(n-1)` for the n-th consecutive failure, capped at `max`
    Exponential { base: Duration, max: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub backoff: Backoff,
    pub max_consecutive_failures: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: Backoff::Fixed(Duration::from_secs(5)),
            max_consecutive_failures: None,
        }
    }
}

impl RetryPolicy {
    pub fn fixed(delay: Duration) -> Self {
        Self {
            backoff: Backoff::Fixed(delay),
            max_consecutive_failures: None,
        }
    }

    pub fn exponential(base: Duration, max: Duration) -> Self {
        Self {
            backoff: Backoff::Exponential { base, max },
            max_consecutive_failures: None,
        }
    }

    pub fn with_max_consecutive_failures(mut self, limit: u32) -> Self {
        self.max_consecutive_failures = Some(limit);
        self
    }

    /// Delay after the given number of consecutive failures (1-based)
    pub fn delay(&self, consecutive_failures: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base, max } => {
                let exponent = consecutive_failures.saturating_sub(1).min(31);
                base.checked_mul(1u32 << exponent)
                    .map_or(max, |delay| delay.min(max))
            }
        }
    }

    /// Whether the loop should stop after this many consecutive failures
    pub fn should_give_up(&self, consecutive_failures: u32) -> bool {
        self.max_consecutive_failures
            .is_some_and(|limit| consecutive_failures >= limit)
    }
}
