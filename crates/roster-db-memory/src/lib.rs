//! # roster-db-memory
//!
//! In-memory backends for the Roster storage ports: a [`MemoryDocumentStore`]
//! and a [`MemoryListingCache`]. Used by the test suites and by local
//! development deployments (`storage.backend = "memory"`).

mod cache;
mod store;

pub use cache::MemoryListingCache;
pub use store::MemoryDocumentStore;
