//! Transport boundary.
//!
//! # Responsibilities
//! - Define the single-attempt contract the executor drives
//! - Describe attempt failures with a kind and a retryability hint
//!
//! # Design Decisions
//! - The executor receives a transport at construction; it never looks one up
//! - A transport drains the wire body before returning, so every attempt
//!   releases its connection whether or not a retry follows
//! - A transport may mutate the request's headers or query while sending;
//!   the executor restores them before the next attempt

pub mod error;

#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;

use async_trait::async_trait;

use crate::http::{Request, Response};

pub use error::{TransportError, TransportErrorKind};

/// Performs exactly one HTTP attempt.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn attempt(&self, request: &mut Request) -> Result<Response, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn attempt(&self, request: &mut Request) -> Result<Response, TransportError> {
        (**self).attempt(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn attempt(&self, request: &mut Request) -> Result<Response, TransportError> {
        (**self).attempt(request).await
    }
}
