//! Retry policy with exponential backoff
//!
//! Decoupled from the operation being retried so callers can test and reuse
//! it independently of the signing backend.

use std::time::Duration;

/// Bounded retry with exponential backoff
///
/// Attempts are numbered from 1. After a failed attempt `n` the caller waits
/// `base_delay * 2^n` before trying again, until `max_attempts` is reached.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Default policy: 3 attempts, waiting 2s then 4s between them
    pub fn default_policy() -> Self {
        Self::new(3, Duration::from_secs(1))
    }

    /// Maximum number of attempts before giving up
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after `attempt` failures
    ///
    /// Returns `None` once the attempt budget is exhausted and the caller
    /// should surface the failure.
    pub fn backoff(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        Some(self.base_delay * 2u32.saturating_pow(attempt))
    }
}
