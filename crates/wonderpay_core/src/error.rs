//! crates/wonderpay_core/src/error.rs
//!
//! The failure taxonomy of the bootstrap, session and ingestion components.

use crate::ports::PortError;

/// Errors surfaced by the core components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Credentials are missing. Fatal, never retried.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The client-credentials exchange failed or returned an unusable body.
    #[error("Failed to get access token: {0}")]
    Auth(String),

    /// Listing or creating the entity failed.
    #[error("Failed to resolve entity: {0}")]
    Tenant(String),

    /// The client handle was requested before bootstrap.
    #[error("Monite SDK not initialized. Call initialize() first.")]
    NotInitialized,

    /// Upload failure, retry exhaustion, or a terminal failure while polling.
    #[error("Document processing failed: {0}")]
    Ingestion(String),
}

impl CoreError {
    pub fn auth(err: PortError) -> Self {
        match err {
            PortError::Status { status, body } if body.is_empty() => {
                Self::Auth(format!("HTTP {status}"))
            }
            PortError::Status { status, body } => Self::Auth(format!("HTTP {status}: {body}")),
            other => Self::Auth(other.to_string()),
        }
    }

    pub fn tenant(err: PortError) -> Self {
        Self::Tenant(err.to_string())
    }

    pub fn ingestion(err: PortError) -> Self {
        Self::Ingestion(err.to_string())
    }
}

/// A convenience type alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;
