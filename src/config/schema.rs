//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a retrying client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Retry budget and backoff settings.
    pub retries: RetryConfig,

    /// Names of the headers read from responses and stamped on retries.
    pub headers: HeaderConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt (0 = no count bound).
    pub max_attempts: u32,

    /// Maximum total time spent on one call in seconds (0 = no time bound).
    pub max_elapsed_secs: u64,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Added to the rate-limit reset instant before resuming.
    pub rate_limit_padding_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            max_elapsed_secs: 0,
            base_delay_ms: 300,
            max_delay_ms: 20_000,
            rate_limit_padding_ms: 1_000,
        }
    }
}

/// Header names used by the retry protocol.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Response header carrying the server-assigned request id.
    pub request_id: String,

    /// Response header carrying the rate-limit reset instant (epoch seconds).
    pub rate_limit_reset: String,

    /// Request header naming the request id being retried.
    pub retry_for: String,

    /// Request header carrying the 1-based attempt number.
    pub retry_count: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            request_id: "X-Request-Id".to_string(),
            rate_limit_reset: "X-Rate-Limit-Reset".to_string(),
            retry_for: "X-Retry-For".to_string(),
            retry_count: "X-Retry-Count".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record retry metrics through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}
