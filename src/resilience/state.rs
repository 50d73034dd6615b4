//! Per-call retry state and the retry headers it stamps.

use hyper::header::{HeaderName, HeaderValue};
use hyper::HeaderMap;

use crate::config::HeaderConfig;
use crate::config::ValidationError;
use crate::http::Response;
use crate::resilience::timer::Timer;

/// Header names used by the retry protocol, parsed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryHeaders {
    pub request_id: HeaderName,
    pub rate_limit_reset: HeaderName,
    pub retry_for: HeaderName,
    pub retry_count: HeaderName,
}

impl RetryHeaders {
    pub fn from_config(config: &HeaderConfig) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut parse = |field: &'static str, value: &str| match HeaderName::from_bytes(value.as_bytes()) {
            Ok(name) => Some(name),
            Err(_) => {
                errors.push(ValidationError::InvalidHeaderName {
                    field,
                    value: value.to_string(),
                });
                None
            }
        };

        let request_id = parse("request_id", &config.request_id);
        let rate_limit_reset = parse("rate_limit_reset", &config.rate_limit_reset);
        let retry_for = parse("retry_for", &config.retry_for);
        let retry_count = parse("retry_count", &config.retry_count);

        match (request_id, rate_limit_reset, retry_for, retry_count) {
            (Some(request_id), Some(rate_limit_reset), Some(retry_for), Some(retry_count)) => Ok(Self {
                request_id,
                rate_limit_reset,
                retry_for,
                retry_count,
            }),
            _ => Err(errors),
        }
    }
}

impl Default for RetryHeaders {
    fn default() -> Self {
        Self {
            request_id: HeaderName::from_static("x-request-id"),
            rate_limit_reset: HeaderName::from_static("x-rate-limit-reset"),
            retry_for: HeaderName::from_static("x-retry-for"),
            retry_count: HeaderName::from_static("x-retry-count"),
        }
    }
}

/// Mutable bookkeeping for one logical call.
#[derive(Debug)]
pub struct RetryState {
    retry_count: u32,
    correlation_id: Option<HeaderValue>,
    timer: Timer,
}

impl RetryState {
    pub fn new() -> Self {
        Self {
            retry_count: 0,
            correlation_id: None,
            timer: Timer::start(),
        }
    }

    /// 0 for the first attempt.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Number of the retry that would follow the current attempt.
    pub fn next_retry(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }

    pub fn advance(&mut self) {
        self.retry_count = self.next_retry();
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.timer.split()
    }

    pub fn correlation_id(&self) -> Option<&HeaderValue> {
        self.correlation_id.as_ref()
    }

    /// Remember the response's request id unless one is already pinned.
    pub fn pin_correlation(&mut self, response: &Response, header: &HeaderName) {
        if self.correlation_id.is_some() {
            return;
        }
        if let Some(id) = response.headers().get(header).filter(|v| !v.is_empty()) {
            self.correlation_id = Some(id.clone());
        }
    }

    /// Add the retry headers for the current attempt. No-op on the first attempt.
    pub fn stamp(&self, headers: &mut HeaderMap, names: &RetryHeaders) {
        if self.retry_count == 0 {
            return;
        }
        if let Some(id) = &self.correlation_id {
            headers.insert(names.retry_for.clone(), id.clone());
        }
        headers.insert(names.retry_count.clone(), HeaderValue::from(self.next_retry()));
    }
}

impl Default for RetryState {
    fn default() -> Self {
        Self::new()
    }
}
