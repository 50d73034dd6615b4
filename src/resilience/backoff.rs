//! Backoff policy.
//!
//! Exponential delay from a fixed base, capped, with a rate-limit override:
//! a `429` carrying a reset instant and a `Date` header waits until just after
//! the reset, measured on the server's clock rather than ours.

use std::time::{Duration, UNIX_EPOCH};

use hyper::header::HeaderName;
use hyper::StatusCode;

use crate::http::Response;

/// Pause chosen before a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Exponential(Duration),
    RateLimited(Duration),
}

impl Backoff {
    pub fn duration(&self) -> Duration {
        match self {
            Backoff::Exponential(d) | Backoff::RateLimited(d) => *d,
        }
    }

    pub fn as_millis(&self) -> u64 {
        u64::try_from(self.duration().as_millis()).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffPolicy {
    base_ms: u64,
    max_ms: u64,
    padding_ms: u64,
    reset_header: HeaderName,
}

impl BackoffPolicy {
    pub const DEFAULT_BASE_MS: u64 = 300;
    pub const DEFAULT_MAX_MS: u64 = 20_000;
    pub const DEFAULT_PADDING_MS: u64 = 1_000;

    pub fn new(base_ms: u64, max_ms: u64, padding_ms: u64, reset_header: HeaderName) -> Self {
        Self {
            base_ms,
            max_ms,
            padding_ms,
            reset_header,
        }
    }

    /// Delay before retry number `retry_count` (1 for the first retry).
    pub fn delay(&self, retry_count: u32, previous: Option<&Response>) -> Backoff {
        if let Some(response) = previous.filter(|r| r.status() == StatusCode::TOO_MANY_REQUESTS) {
            if let Some(delay) = self.rate_limit_delay(response) {
                return Backoff::RateLimited(delay);
            }
        }
        Backoff::Exponential(self.exponential(retry_count))
    }

    /// `min(base * 2^retry_count, max)`.
    pub fn exponential(&self, retry_count: u32) -> Duration {
        let scaled = 2u64
            .checked_pow(retry_count)
            .and_then(|factor| factor.checked_mul(self.base_ms))
            .unwrap_or(u64::MAX);
        Duration::from_millis(scaled.min(self.max_ms))
    }

    /// `reset * 1000 - date + padding`, or `None` if the hint is unusable.
    pub fn rate_limit_delay(&self, response: &Response) -> Option<Duration> {
        let raw = response.single_header(&self.reset_header)?.to_str().ok()?;
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let reset_ms = raw.parse::<u64>().ok()?.checked_mul(1_000)?;

        let date_ms = response.date()?.duration_since(UNIX_EPOCH).ok()?.as_millis();
        if date_ms == 0 {
            return None;
        }

        let delay = i128::from(reset_ms) - i128::try_from(date_ms).ok()? + i128::from(self.padding_ms);
        if delay < 0 {
            return None;
        }
        u64::try_from(delay).ok().map(Duration::from_millis)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_BASE_MS,
            Self::DEFAULT_MAX_MS,
            Self::DEFAULT_PADDING_MS,
            HeaderName::from_static("x-rate-limit-reset"),
        )
    }
}
