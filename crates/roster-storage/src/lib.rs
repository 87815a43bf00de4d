//! # roster-storage
//!
//! Storage abstraction layer for the Roster user service.
//!
//! This crate defines the traits and types the service is built against.
//! It does not contain any implementations - those are provided by separate
//! crates (`roster-db-memory`, `roster-cache-redis`).
//!
//! ## Overview
//!
//! Two ports:
//! - [`DocumentStore`] - the authoritative store: collection CRUD and
//!   query-by-field over raw JSON documents.
//! - [`ListingCache`] - the best-effort cache: get / set-with-TTL / delete
//!   on fixed logical keys.
//!
//! ## Example
//!
//! ```ignore
//! use roster_storage::{DocumentStore, StorageError, StoredDocument};
//!
//! async fn find_account(
//!     store: &dyn DocumentStore,
//!     email: &str,
//! ) -> Result<Vec<StoredDocument>, StorageError> {
//!     store
//!         .find_by_field("users", "email", &serde_json::json!(email))
//!         .await
//! }
//! ```

mod error;
mod traits;
mod types;

// Re-export everything from submodules
pub use error::{CacheError, CacheResult, StorageError, StorageResult};
pub use traits::{DocumentStore, DynCache, DynStore, ListingCache};
pub use types::StoredDocument;
