//! Terminal failures of a logical call.

use std::io;

use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum RetryError {
    /// Transport failed and was not (or no longer) retryable. `first` is the
    /// earliest failure; later ones are kept in order in `suppressed`.
    #[error("Unable to execute HTTP request: {first}")]
    Transport {
        #[source]
        first: TransportError,
        suppressed: Vec<TransportError>,
        attempts: u32,
    },

    /// The next pause would have overrun the retry budget.
    #[error("Cannot retry request, next request will exceed retry configuration (retry {retry_count}, {elapsed_ms}ms elapsed, {delay_ms}ms pause)")]
    BudgetExceeded {
        retry_count: u32,
        elapsed_ms: u64,
        delay_ms: u64,
    },

    /// A retry was needed but the request body could not be rewound.
    #[error("Unable to replay request body: {source}")]
    BodyNotReplayable {
        #[source]
        source: io::Error,
        failures: Vec<TransportError>,
    },

    /// The call was cancelled while waiting to retry.
    #[error("Request cancelled while waiting to retry")]
    Cancelled { failures: Vec<TransportError> },
}

impl RetryError {
    /// Every transport failure seen, primary first.
    pub fn transport_failures(&self) -> Vec<&TransportError> {
        match self {
            RetryError::Transport { first, suppressed, .. } => {
                std::iter::once(first).chain(suppressed.iter()).collect()
            }
            RetryError::BodyNotReplayable { failures, .. } | RetryError::Cancelled { failures } => {
                failures.iter().collect()
            }
            RetryError::BudgetExceeded { .. } => Vec::new(),
        }
    }
}

/// Transport failures accumulated across the attempts of one call.
#[derive(Debug, Default)]
pub(crate) struct FailureChain {
    first: Option<TransportError>,
    suppressed: Vec<TransportError>,
}

impl FailureChain {
    pub(crate) fn push(&mut self, err: TransportError) {
        match self.first {
            None => self.first = Some(err),
            Some(_) => self.suppressed.push(err),
        }
    }

    /// Close the chain with the failure that ended the call.
    pub(crate) fn finish(mut self, last: TransportError, attempts: u32) -> RetryError {
        let first = match self.first.take() {
            Some(first) => {
                self.suppressed.push(last);
                first
            }
            None => last,
        };
        RetryError::Transport {
            first,
            suppressed: self.suppressed,
            attempts,
        }
    }

    /// Close the chain with a failure raised between attempts.
    ///
    /// A refused pause after transport failures reports the transport chain,
    /// primary failure first. Other stops keep their own variant and carry
    /// the failures seen so far.
    pub(crate) fn conclude(self, stop: RetryError, attempts: u32) -> RetryError {
        let Some(first) = self.first else {
            return stop;
        };
        let seen = |first: TransportError, suppressed: Vec<TransportError>| {
            std::iter::once(first).chain(suppressed).collect::<Vec<_>>()
        };

        match stop {
            RetryError::BudgetExceeded { .. } => RetryError::Transport {
                first,
                suppressed: self.suppressed,
                attempts,
            },
            RetryError::BodyNotReplayable { source, .. } => RetryError::BodyNotReplayable {
                source,
                failures: seen(first, self.suppressed),
            },
            RetryError::Cancelled { .. } => RetryError::Cancelled {
                failures: seen(first, self.suppressed),
            },
            other => other,
        }
    }
}
