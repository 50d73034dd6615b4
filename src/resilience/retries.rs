//! Retry classification.
//!
//! # Responsibilities
//! - Turn the result of one attempt into an `Outcome`
//! - Decide which statuses and transport faults are worth retrying
//!
//! # Design Decisions
//! - Classification is a pure function of the attempt result and whether
//!   the budget still allows another attempt
//! - Only 429, 503 and 504 are retried; any other status goes back to the
//!   caller as a normal response
//! - Transient network faults and transport-flagged failures are retried;
//!   everything else ends the call

use hyper::StatusCode;

use crate::http::Response;
use crate::transport::TransportError;

/// Classified result of one attempt.
#[derive(Debug)]
pub enum Outcome {
    Success(Response),
    RetryableResponse(Response),
    RetryableException(TransportError),
    TerminalException(TransportError),
}

impl Outcome {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Outcome::RetryableResponse(_) | Outcome::RetryableException(_))
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::RetryableResponse(_) => "retryable_response",
            Outcome::RetryableException(_) => "retryable_error",
            Outcome::TerminalException(_) => "terminal_error",
        }
    }
}

pub fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Classify an attempt. `may_retry` is the budget's answer for the next attempt.
pub fn classify(result: Result<Response, TransportError>, may_retry: bool) -> Outcome {
    match result {
        Ok(response) if may_retry && is_retryable_status(response.status()) => {
            Outcome::RetryableResponse(response)
        }
        Ok(response) => Outcome::Success(response),
        Err(err) if may_retry && err.is_retryable() => Outcome::RetryableException(err),
        Err(err) => Outcome::TerminalException(err),
    }
}
