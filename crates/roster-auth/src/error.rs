//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during credential verification and token handling.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credential verification failed.
    ///
    /// Unknown email and wrong password both map to this variant with the
    /// same text, so callers cannot tell which check failed.
    #[error("invalid email or password")]
    Unauthorized,

    /// Failed to encode an access token.
    #[error("Failed to encode token: {message}")]
    TokenEncoding {
        /// Description of the encoding error.
        message: String,
    },

    /// The access token is invalid, expired, or malformed.
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of why the token is invalid.
        message: String,
    },

    /// Password hashing or hash parsing failed.
    #[error("Password hash error: {message}")]
    Hash {
        /// Description of the hashing error.
        message: String,
    },

    /// An error occurred while reading auth data from the store.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The stored account document could not be parsed.
    #[error("Malformed account document: {message}")]
    MalformedAccount {
        /// Description of the parse failure.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `TokenEncoding` error.
    #[must_use]
    pub fn token_encoding(message: impl Into<String>) -> Self {
        Self::TokenEncoding {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `Hash` error.
    #[must_use]
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `MalformedAccount` error.
    #[must_use]
    pub fn malformed_account(message: impl Into<String>) -> Self {
        Self::MalformedAccount {
            message: message.into(),
        }
    }
}

impl From<roster_storage::StorageError> for AuthError {
    fn from(err: roster_storage::StorageError) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::hash(err.to_string())
    }
}

/// Convenience result type for auth operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;
