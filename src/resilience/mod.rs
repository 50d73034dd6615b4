//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! RetryExecutor::execute(request):
//!     → snapshot.rs (capture headers and query)
//!     → state.rs (stamp retry headers on every attempt after the first)
//!     → Transport::attempt
//!     → retries.rs (classify: success, retryable, terminal)
//!     → budget.rs (may another attempt start?)
//!     → backoff.rs (exponential or rate-limit pause)
//!     → cancel.rs (abort the pause early)
//!     → snapshot.rs (restore before the next attempt and on exit)
//! ```
//!
//! # Design Decisions
//! - Only 429, 503 and 504 are retried; every other status goes back as-is
//! - Transport failures are retried when the kind is transient or the
//!   transport flags them; the first failure stays the primary error
//! - A pause is refused before it starts if it would overrun the budget

pub mod backoff;
pub mod budget;
pub mod cancel;
pub mod error;
pub mod executor;
pub mod retries;
pub mod snapshot;
pub mod state;
pub mod timer;

pub use backoff::{Backoff, BackoffPolicy};
pub use budget::RetryBudget;
pub use cancel::{CancelToken, Cancellation};
pub use error::RetryError;
pub use executor::{RetryExecutor, RetryPolicy};
pub use retries::Outcome;
pub use state::RetryHeaders;
