//! Storage traits for the document-store and cache abstraction layer.
//!
//! This module defines the two async ports the service is built against:
//! the authoritative [`DocumentStore`] and the best-effort [`ListingCache`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CacheResult, StorageResult};
use crate::types::StoredDocument;

/// The authoritative document store.
///
/// Collections are addressed by name (e.g. `"users"`, `"posts"`); documents
/// are raw JSON objects. Implementations must be thread-safe (`Send + Sync`)
/// and rely on the backend's per-document atomicity for individual writes;
/// no cross-document transactions are assumed.
///
/// # Example
///
/// ```ignore
/// use roster_storage::{DynStore, StorageError};
///
/// async fn load_user(store: &DynStore, id: &str) -> Result<StoredDocument, StorageError> {
///     store
///         .find_by_id("users", id)
///         .await?
///         .ok_or_else(|| StorageError::not_found("users", id))
/// }
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document and assigns it an id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidDocument` if the body is not a JSON object.
    async fn insert(&self, collection: &str, document: &Value) -> StorageResult<StoredDocument>;

    /// Reads a document by id. Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing documents.
    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> StorageResult<Option<StoredDocument>>;

    /// Returns every document whose top-level `field` equals `value`.
    ///
    /// Result order is unspecified. An empty vector means no match.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StorageResult<Vec<StoredDocument>>;

    /// Returns every document in the collection, order unspecified.
    async fn list(&self, collection: &str) -> StorageResult<Vec<StoredDocument>>;

    /// Shallow-merges `patch` into an existing document and returns the result.
    ///
    /// Top-level keys of `patch` replace the corresponding keys of the stored
    /// body; keys absent from `patch` are preserved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the document does not exist.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: &Value,
    ) -> StorageResult<StoredDocument>;

    /// Deletes a document by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the document does not exist.
    async fn delete(&self, collection: &str, id: &str) -> StorageResult<()>;

    /// Returns the name of this backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// The shared listing cache: a handful of fixed logical keys with TTL.
///
/// The cache is a best-effort acceleration layer. It may be absent, stale up
/// to its TTL, or wiped at any time without breaking correctness; the
/// [`DocumentStore`] is always the source of truth. Values are opaque
/// serialized strings.
#[async_trait]
pub trait ListingCache: Send + Sync {
    /// Reads the value at `key`. Returns `None` on a miss or natural expiry.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Writes `value` at `key` with the given time-to-live.
    ///
    /// A concurrent writer may overwrite this entry at any time; last writer
    /// wins and no coordination is attempted.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Removes the entry at `key`, forcing the next read to miss.
    ///
    /// Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Returns the name of this backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// Shared-ownership store handle used across the service.
pub type DynStore = std::sync::Arc<dyn DocumentStore>;

/// Shared-ownership cache handle used across the service.
pub type DynCache = std::sync::Arc<dyn ListingCache>;
