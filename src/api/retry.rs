//! Retry policy for API requests
//!
//! Decides which HTTP statuses are transient and how long to wait before each
//! retry. The retry loop itself lives in [`FetchClient`](super::FetchClient).

use std::time::Duration;

/// Statuses that indicate a transient server-side or rate-limit condition
pub const RETRYABLE_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// What to do with a failed HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Worth another attempt if the budget allows
    Retryable,
    /// Fail immediately without consuming retry budget
    Fatal,
}

/// Configuration for retrying failed requests
///
/// Total attempts are `max_retries + 1`. The delay before the i-th retry
/// (0-indexed) is `base_delay * 2^i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// HTTP statuses that trigger a retry
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(1000),
            retryable_statuses: RETRYABLE_STATUSES.to_vec(),
        }
    }
}

impl RetryPolicy {
    /// Classifies a non-success HTTP status
    pub fn classify(&self, status: u16) -> Disposition {
        if self.retryable_statuses.contains(&status) {
            Disposition::Retryable
        } else {
            Disposition::Fatal
        }
    }

    /// Backoff before retry number `retry_index` (0 for the first retry)
    pub fn delay_for(&self, retry_index: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry_index);
        self.base_delay.saturating_mul(factor)
    }

    /// Returns a copy with the per-request overrides applied
    pub fn with_overrides(&self, retries: Option<u32>, delay: Option<Duration>) -> Self {
        Self {
            max_retries: retries.unwrap_or(self.max_retries),
            base_delay: delay.unwrap_or(self.base_delay),
            retryable_statuses: self.retryable_statuses.clone(),
        }
    }
}
