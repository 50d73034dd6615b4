//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or in-memory ClientConfig
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated)
//!     → RetryPolicy::from_config (resolved once, immutable)
//!     → owned by one RetryExecutor
//! ```
//!
//! # Design Decisions
//! - Config is resolved into a policy once; nothing is recomputed lazily
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ClientConfig;
pub use schema::HeaderConfig;
pub use schema::ObservabilityConfig;
pub use schema::RetryConfig;
pub use validation::{validate_config, ValidationError};
