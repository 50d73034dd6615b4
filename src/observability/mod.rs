//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! RetryExecutor produces:
//!     → logging.rs (structured log events inside a per-call span)
//!     → metrics.rs (attempt/retry/call counters, call duration histogram)
//!
//! Consumers:
//!     → whatever tracing subscriber the application installs
//!     → whatever metrics recorder the application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a metrics exporter; recording is a no-op
//!   until the application sets a recorder
//! - Each logical call gets a UUID `call_id` span field shared by all attempts
//! - Log events never change control flow

pub mod logging;
pub mod metrics;
