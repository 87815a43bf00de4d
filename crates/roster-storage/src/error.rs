//! Error types for the storage and cache abstraction layer.

use thiserror::Error;

/// Errors that can occur during document-store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested document was not found.
    #[error("Document not found: {collection}/{id}")]
    NotFound {
        /// The collection that was queried.
        collection: String,
        /// The document id that was not found.
        id: String,
    },

    /// The document data is invalid.
    #[error("Invalid document: {message}")]
    InvalidDocument {
        /// Description of why the document is invalid.
        message: String,
    },

    /// Failed to reach the storage backend.
    #[error("Connection error: {message}")]
    ConnectionError {
        /// Description of the connection error.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates a new `InvalidDocument` error.
    #[must_use]
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Creates a new `ConnectionError` error.
    #[must_use]
    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this error means the document does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors that can occur during cache operations.
///
/// The cache is a best-effort layer; callers on the read path are expected
/// to treat these as misses and fall back to the authoritative store.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to reach the cache backend.
    #[error("Cache connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// The cache backend rejected the operation.
    #[error("Cache backend error: {message}")]
    Backend {
        /// Description of the backend error.
        message: String,
    },
}

impl CacheError {
    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Backend` error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Convenience result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Convenience result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
