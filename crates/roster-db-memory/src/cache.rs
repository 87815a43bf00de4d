//! In-memory listing cache with per-entry TTL.
//!
//! Mirrors the semantics of the redis backend closely enough that the
//! service tests exercise the real expiry behavior without a network hop.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

use roster_storage::{CacheResult, ListingCache};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: OffsetDateTime,
}

/// In-memory cache backend. Expired entries are evicted lazily on read.
#[derive(Debug, Default)]
pub struct MemoryListingCache {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl MemoryListingCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Number of live entries (expired ones included until touched). Test helper.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ListingCache for MemoryListingCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > OffsetDateTime::now_utc() {
                return Ok(Some(entry.value.clone()));
            }
        } else {
            return Ok(None);
        }
        // Entry existed but is past its TTL.
        self.entries.remove(key);
        Ok(None)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let entry = CacheEntry {
            value: value.to_string(),
            expires_at: OffsetDateTime::now_utc() + ttl,
        };
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
