//! Retry metrics.
//!
//! # Metrics
//! - `resilient_http_attempts_total` (counter): attempts by classified outcome
//! - `resilient_http_retries_total` (counter): retries by reason (status, transport)
//! - `resilient_http_calls_total` (counter): logical calls by result
//! - `resilient_http_call_duration_seconds` (histogram): wall time per logical call

use std::time::Duration;

use metrics::{counter, histogram};

use crate::http::Response;
use crate::resilience::error::RetryError;
use crate::resilience::retries::Outcome;

/// Why a retry was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    Status,
    Transport,
}

impl RetryReason {
    fn as_str(self) -> &'static str {
        match self {
            RetryReason::Status => "status",
            RetryReason::Transport => "transport",
        }
    }
}

/// Metric sink for one executor. Disabled sinks record nothing.
#[derive(Debug, Clone, Copy)]
pub struct CallMetrics {
    enabled: bool,
}

impl CallMetrics {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record_attempt(&self, outcome: &Outcome) {
        if self.enabled {
            counter!("resilient_http_attempts_total", "outcome" => outcome.label()).increment(1);
        }
    }

    pub fn record_retry(&self, reason: RetryReason) {
        if self.enabled {
            counter!("resilient_http_retries_total", "reason" => reason.as_str()).increment(1);
        }
    }

    pub fn record_call(&self, result: &Result<Response, RetryError>, elapsed: Duration) {
        if !self.enabled {
            return;
        }
        let label = call_result_label(result);
        counter!("resilient_http_calls_total", "result" => label).increment(1);
        histogram!("resilient_http_call_duration_seconds", "result" => label).record(elapsed.as_secs_f64());
    }
}

impl Default for CallMetrics {
    fn default() -> Self {
        Self::new(true)
    }
}

fn call_result_label(result: &Result<Response, RetryError>) -> &'static str {
    match result {
        Ok(_) => "response",
        Err(RetryError::Transport { .. }) => "transport_error",
        Err(RetryError::BudgetExceeded { .. }) => "budget_exceeded",
        Err(RetryError::BodyNotReplayable { .. }) => "body_not_replayable",
        Err(RetryError::Cancelled { .. }) => "cancelled",
    }
}
