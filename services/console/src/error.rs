//! services/console/src/error.rs
//!
//! Defines the primary error type for the console service.

use crate::config::ConfigError;
use wonderpay_core::CoreError;

/// The primary error type for the `console` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the console core.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Represents an error from the HTTP client library.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
