//! API error aggregation and HTTP status mapping.

use thiserror::Error;

use roster_auth::AuthError;
use roster_core::CoreError;
use roster_storage::{CacheError, StorageError};

/// Errors surfaced by the user-service operations.
///
/// Domain errors (`Conflict`, `Unauthorized`, `NotFound`) carry their 4xx
/// status; infrastructure faults from the store or cache are not handled in
/// this layer and surface as 500 envelopes at the HTTP edge - no retry, no
/// backoff, no partial-failure recovery.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl ApiError {
    /// The numeric status carried by the response envelope.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Core(e) => e.status_code(),
            Self::Auth(AuthError::Unauthorized) => 401,
            Self::Auth(_) => 500,
            // A storage NotFound that escapes the service layer unmapped
            // still means the target does not exist.
            Self::Storage(e) if e.is_not_found() => 404,
            Self::Storage(_) | Self::Cache(_) => 500,
        }
    }

    /// The human-readable envelope message.
    pub fn message(&self) -> String {
        match self {
            // Infrastructure details stay out of client-facing messages.
            Self::Storage(e) if !e.is_not_found() => {
                tracing::error!(error = %e, "storage fault");
                "internal server error".to_string()
            }
            Self::Cache(e) => {
                tracing::error!(error = %e, "cache fault");
                "internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Convenience result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
