//! HTTP message model shared by the executor and transports.
//!
//! # Data Flow
//! ```text
//! caller builds Request
//!     → RetryExecutor borrows it for one logical call
//!     → Transport reads method/url/query/headers/body per attempt
//!     → Transport returns a fully buffered Response
//! ```
//!
//! # Design Decisions
//! - Header and method types come from `hyper` so transports built on
//!   hyper, reqwest or axum can pass them through untouched
//! - Responses own their body as `Bytes`; nothing streams past an attempt
//! - Request bodies declare up front whether they can be replayed

pub mod request;
pub mod response;

pub use request::{Body, QueryParams, Request};
pub use response::Response;
