//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check header names are valid HTTP tokens
//! - Validate value ranges (backoff base not above its cap)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is turned into a retry policy

use hyper::header::HeaderName;
use thiserror::Error;

use crate::config::schema::ClientConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("headers.{field}: '{value}' is not a valid header name")]
    InvalidHeaderName { field: &'static str, value: String },

    #[error("retries.base_delay_ms ({base}) exceeds retries.max_delay_ms ({max})")]
    BackoffBaseAboveCap { base: u64, max: u64 },

    #[error("observability.log_level: unknown level '{0}'")]
    UnknownLogLevel(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let headers = &config.headers;
    for (field, value) in [
        ("request_id", &headers.request_id),
        ("rate_limit_reset", &headers.rate_limit_reset),
        ("retry_for", &headers.retry_for),
        ("retry_count", &headers.retry_count),
    ] {
        if HeaderName::from_bytes(value.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName {
                field,
                value: value.clone(),
            });
        }
    }

    let retries = &config.retries;
    if retries.base_delay_ms > retries.max_delay_ms {
        errors.push(ValidationError::BackoffBaseAboveCap {
            base: retries.base_delay_ms,
            max: retries.max_delay_ms,
        });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
