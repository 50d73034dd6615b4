//! Retrying request executor.
//!
//! # State Machine
//! ```text
//! Start ─▶ Attempting ─▶ Succeeded
//!              │
//!              ▼
//!        EvaluatingRetry ─▶ Failed
//!              │
//!              ▼
//!          Pausing ─▶ Attempting (retry_count + 1)
//! ```
//!
//! # Responsibilities
//! - Snapshot the request, run attempts strictly one after another
//! - Classify each attempt, pause with backoff, restore request state
//! - Stop on success, on a terminal failure, or when the budget runs out
//!
//! # Design Decisions
//! - A retryable status that runs out of budget is returned as a normal
//!   response; only transport failures and refused pauses become errors
//! - The whole loop stays on the task that started it; a retry is never
//!   handed back to the caller's runtime
//! - Cancellation is only observed while pausing

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{validate_config, ClientConfig, ConfigError};
use crate::http::{Request, Response};
use crate::observability::metrics::{CallMetrics, RetryReason};
use crate::resilience::backoff::{Backoff, BackoffPolicy};
use crate::resilience::budget::RetryBudget;
use crate::resilience::cancel::CancelToken;
use crate::resilience::error::{FailureChain, RetryError};
use crate::resilience::retries::{classify, Outcome};
use crate::resilience::snapshot::RequestSnapshot;
use crate::resilience::state::{RetryHeaders, RetryState};
use crate::transport::Transport;

/// Immutable retry settings, resolved once from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    budget: RetryBudget,
    backoff: BackoffPolicy,
    headers: RetryHeaders,
    metrics_enabled: bool,
}

impl RetryPolicy {
    pub fn new(budget: RetryBudget, backoff: BackoffPolicy, headers: RetryHeaders) -> Self {
        Self {
            budget,
            backoff,
            headers,
            metrics_enabled: true,
        }
    }

    /// Validate `config` and resolve it into a policy.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;
        let headers = RetryHeaders::from_config(&config.headers).map_err(ConfigError::Validation)?;

        let retries = &config.retries;
        let budget = RetryBudget::new(
            retries.max_attempts,
            retries.max_elapsed_secs.saturating_mul(1_000),
        );
        let backoff = BackoffPolicy::new(
            retries.base_delay_ms,
            retries.max_delay_ms,
            retries.rate_limit_padding_ms,
            headers.rate_limit_reset.clone(),
        );

        Ok(Self::new(budget, backoff, headers).with_metrics(config.observability.metrics_enabled))
    }

    /// First failure is final.
    pub fn no_retry() -> Self {
        Self::new(RetryBudget::disabled(), BackoffPolicy::default(), RetryHeaders::default())
    }

    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    pub fn budget(&self) -> &RetryBudget {
        &self.budget
    }

    pub fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }

    pub fn headers(&self) -> &RetryHeaders {
        &self.headers
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        let retries = crate::config::RetryConfig::default();
        Self::new(
            RetryBudget::new(retries.max_attempts, retries.max_elapsed_secs.saturating_mul(1_000)),
            BackoffPolicy::default(),
            RetryHeaders::default(),
        )
    }
}

/// Wraps a transport with retry, backoff and a retry budget.
///
/// Holds no per-call state; one executor can serve any number of
/// concurrent calls.
pub struct RetryExecutor<T> {
    policy: RetryPolicy,
    transport: T,
    metrics: CallMetrics,
}

impl<T: Transport> RetryExecutor<T> {
    pub fn new(policy: RetryPolicy, transport: T) -> Self {
        let metrics = CallMetrics::new(policy.metrics_enabled);
        Self {
            policy,
            transport,
            metrics,
        }
    }

    pub fn from_config(config: &ClientConfig, transport: T) -> Result<Self, ConfigError> {
        Ok(Self::new(RetryPolicy::from_config(config)?, transport))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one logical call to completion.
    pub async fn execute(&self, request: &mut Request) -> Result<Response, RetryError> {
        self.execute_with_cancel(request, &CancelToken::never()).await
    }

    /// Run one logical call, giving up early if `cancel` fires during a pause.
    ///
    /// Headers and query parameters of `request` are back to their original
    /// values when this returns, whatever the result.
    pub async fn execute_with_cancel(
        &self,
        request: &mut Request,
        cancel: &CancelToken,
    ) -> Result<Response, RetryError> {
        let call_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "http_call",
            call_id = %call_id,
            method = %request.method(),
            url = %request.url(),
        );

        let started = Instant::now();
        let snapshot = RequestSnapshot::capture(request);
        let result = self.run(request, &snapshot, cancel).instrument(span).await;
        snapshot.restore(request);

        self.metrics.record_call(&result, started.elapsed());
        result
    }

    async fn run(
        &self,
        request: &mut Request,
        snapshot: &RequestSnapshot,
        cancel: &CancelToken,
    ) -> Result<Response, RetryError> {
        let mut state = RetryState::new();
        let mut failures = FailureChain::default();

        loop {
            state.stamp(request.headers_mut(), &self.policy.headers);

            let result = self.transport.attempt(request).await;
            let may_retry = self
                .policy
                .budget
                .permits(state.next_retry(), state.elapsed_ms());
            let outcome = classify(result, may_retry);
            self.metrics.record_attempt(&outcome);

            let (previous, reason) = match outcome {
                Outcome::Success(response) => {
                    tracing::debug!(
                        status = %response.status(),
                        retry_count = state.retry_count(),
                        "Request completed"
                    );
                    return Ok(response);
                }
                Outcome::RetryableResponse(response) => {
                    state.pin_correlation(&response, &self.policy.headers.request_id);
                    tracing::info!(
                        status = %response.status(),
                        retry_count = state.retry_count(),
                        "Retryable response"
                    );
                    (Some(response), RetryReason::Status)
                }
                Outcome::RetryableException(err) => {
                    tracing::info!(
                        error = %err,
                        retry_count = state.retry_count(),
                        "Retryable transport error"
                    );
                    failures.push(err);
                    (None, RetryReason::Transport)
                }
                Outcome::TerminalException(err) => {
                    tracing::debug!(
                        error = %err,
                        retry_count = state.retry_count(),
                        "Transport error is final"
                    );
                    return Err(failures.finish(err, state.next_retry()));
                }
            };

            if let Err(stop) = self.prepare_retry(request, &state, previous.as_ref(), cancel).await {
                return Err(failures.conclude(stop, state.next_retry()));
            }

            self.metrics.record_retry(reason);
            state.advance();
            snapshot.restore(request);
        }
    }

    /// Rewind the body and pause. Errors carry no transport failures yet.
    async fn prepare_retry(
        &self,
        request: &mut Request,
        state: &RetryState,
        previous: Option<&Response>,
        cancel: &CancelToken,
    ) -> Result<(), RetryError> {
        request
            .body_mut()
            .rewind()
            .map_err(|source| RetryError::BodyNotReplayable {
                source,
                failures: Vec::new(),
            })?;

        self.pause(state, previous, cancel).await
    }

    /// Wait before the next attempt, unless the wait itself would break the budget.
    async fn pause(
        &self,
        state: &RetryState,
        previous: Option<&Response>,
        cancel: &CancelToken,
    ) -> Result<(), RetryError> {
        let budget = &self.policy.budget;
        let retry_count = state.next_retry();
        let elapsed_ms = state.elapsed_ms();

        if !budget.permits(retry_count, elapsed_ms) {
            return Err(refuse(retry_count, elapsed_ms, 0));
        }

        let backoff = self.policy.backoff.delay(retry_count, previous);
        let delay_ms = backoff.as_millis();
        if !budget.permits(retry_count, elapsed_ms.saturating_add(delay_ms)) {
            return Err(refuse(retry_count, elapsed_ms, delay_ms));
        }

        tracing::debug!(
            retry_count,
            delay_ms,
            rate_limited = matches!(backoff, Backoff::RateLimited(_)),
            "Retryable condition detected, pausing"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::warn!(retry_count, "Retry pause cancelled");
                Err(RetryError::Cancelled { failures: Vec::new() })
            }
            _ = tokio::time::sleep(backoff.duration()) => Ok(()),
        }
    }
}

impl<T: Transport + 'static> RetryExecutor<T> {
    /// Run a call as its own task on `runtime`.
    ///
    /// The task keeps every retry for itself, so a retrying call occupies one
    /// task for its whole lifetime. The request comes back with the result.
    pub fn spawn(
        self: &Arc<Self>,
        runtime: &Handle,
        mut request: Request,
        cancel: CancelToken,
    ) -> JoinHandle<(Request, Result<Response, RetryError>)> {
        let executor = Arc::clone(self);
        runtime.spawn(async move {
            let result = executor.execute_with_cancel(&mut request, &cancel).await;
            (request, result)
        })
    }
}

fn refuse(retry_count: u32, elapsed_ms: u64, delay_ms: u64) -> RetryError {
    tracing::warn!(
        retry_count,
        elapsed_ms,
        delay_ms,
        "Unable to pause for retry: next request will exceed retry configuration"
    );
    RetryError::BudgetExceeded {
        retry_count,
        elapsed_ms,
        delay_ms,
    }
}
