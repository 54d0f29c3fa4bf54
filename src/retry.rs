//! Retry policy for transient HTTP failures
//!
//! Throttling (429) and temporary unavailability (503, 504) are
//! retried. The server's `Retry-After` header wins when present,
//! otherwise the delay doubles on every attempt.

use crate::config::HttpConfig;
use reqwest::StatusCode;
use reqwest::header::HeaderValue;
use std::time::Duration;

const MAX_DELAY: Duration = Duration::from_secs(180);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn from_config(http: &HttpConfig) -> Self {
        Self {
            max_retries: http.max_retries,
            base_delay: http.retry_delay,
        }
    }

    #[must_use]
    pub fn is_retryable(status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::TOO_MANY_REQUESTS
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT
        )
    }

    /// Whether a response with `status` on zero-based `attempt` should
    /// be retried.
    #[must_use]
    pub fn should_retry(&self, status: StatusCode, attempt: u32) -> bool {
        attempt < self.max_retries && Self::is_retryable(status)
    }

    /// How long to wait before retry number `attempt + 1`.
    #[must_use]
    pub fn delay(&self, attempt: u32, retry_after: Option<&HeaderValue>) -> Duration {
        let delay = retry_after
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map_or_else(
                || self.base_delay.saturating_mul(2u32.saturating_pow(attempt)),
                Duration::from_secs,
            );
        delay.min(MAX_DELAY)
    }
}
