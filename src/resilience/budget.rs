//! Retry budget.
//!
//! # Responsibilities
//! - Bound retries by count and by total elapsed time
//! - Answer "may another attempt start?" as a pure predicate
//!
//! # Design Decisions
//! - A zero bound disables that dimension; both zero disables retries
//! - Consulted before computing a pause and again with the pause added,
//!   so a wait that would overrun the budget is refused up front

/// Combined attempt-count and elapsed-time ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    max_attempts: u32,
    max_elapsed_ms: u64,
}

impl RetryBudget {
    pub fn new(max_attempts: u32, max_elapsed_ms: u64) -> Self {
        Self {
            max_attempts,
            max_elapsed_ms,
        }
    }

    /// A budget that never permits a retry.
    pub fn disabled() -> Self {
        Self::new(0, 0)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn max_elapsed_ms(&self) -> u64 {
        self.max_elapsed_ms
    }

    pub fn is_disabled(&self) -> bool {
        self.max_attempts == 0 && self.max_elapsed_ms == 0
    }

    /// Whether retry number `retry_count` may start after `elapsed_ms`.
    pub fn permits(&self, retry_count: u32, elapsed_ms: u64) -> bool {
        if self.is_disabled() {
            return false;
        }
        if self.max_attempts > 0 && retry_count > self.max_attempts {
            return false;
        }
        if self.max_elapsed_ms > 0 && elapsed_ms >= self.max_elapsed_ms {
            return false;
        }
        true
    }
}
