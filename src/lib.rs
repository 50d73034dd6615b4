//! Retrying HTTP request executor with rate-limit aware backoff.

pub mod config;
pub mod http;
pub mod observability;
pub mod resilience;
pub mod transport;

pub use config::schema::ClientConfig;
pub use http::{Body, Request, Response};
pub use resilience::{CancelToken, Cancellation, RetryError, RetryExecutor, RetryPolicy};
pub use transport::{Transport, TransportError, TransportErrorKind};
