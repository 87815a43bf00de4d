use thiserror::Error;

/// Core error types for Roster account operations
#[derive(Debug, Error)]
pub enum CoreError {
    /// An account with the same email already exists.
    #[error("Account conflict: email '{email}' is already registered")]
    Conflict {
        /// The email that collided with an existing account.
        email: String,
    },

    /// Credential verification failed.
    ///
    /// The message is identical for an unknown email and a wrong password
    /// so callers cannot enumerate accounts from the error text.
    #[error("invalid email or password")]
    Unauthorized,

    /// The operation targeted an account that does not exist.
    #[error("Account not found: {id}")]
    NotFound {
        /// The account identifier that was not found.
        id: String,
    },

    /// The supplied account data is malformed.
    #[error("Invalid account data: {message}")]
    InvalidAccount { message: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    /// Create a new Conflict error
    pub fn conflict(email: impl Into<String>) -> Self {
        Self::Conflict {
            email: email.into(),
        }
    }

    /// Create a new NotFound error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a new InvalidAccount error
    pub fn invalid_account(message: impl Into<String>) -> Self {
        Self::InvalidAccount {
            message: message.into(),
        }
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Check if this error is a client error (4xx category)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Conflict { .. }
                | Self::Unauthorized
                | Self::NotFound { .. }
                | Self::InvalidAccount { .. }
                | Self::JsonError(_)
        )
    }

    /// Check if this error is a server error (5xx category)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// HTTP status carried by the response envelope for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Conflict { .. } => 409,
            Self::Unauthorized => 401,
            Self::NotFound { .. } => 404,
            Self::InvalidAccount { .. } | Self::JsonError(_) => 400,
            Self::Configuration(_) => 500,
        }
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::Unauthorized => ErrorCategory::Unauthorized,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidAccount { .. } => ErrorCategory::Validation,
            Self::JsonError(_) => ErrorCategory::Serialization,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    Serialization,
    Configuration,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Serialization => write!(f, "serialization"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
