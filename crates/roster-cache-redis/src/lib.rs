//! # roster-cache-redis
//!
//! Redis implementation of the [`ListingCache`] port, backed by a
//! deadpool-redis connection pool. Entries are written with `SET EX` so the
//! server enforces the TTL; invalidation is a plain `DEL`.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;

use roster_storage::{CacheError, CacheResult, ListingCache};

/// Redis-backed listing cache.
pub struct RedisListingCache {
    pool: Pool,
}

impl RedisListingCache {
    /// Creates a cache from an existing pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Creates a cache from a redis URL, e.g. `redis://127.0.0.1:6379`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if the pool cannot be built.
    pub fn from_url(url: &str) -> CacheResult<Self> {
        let cfg = Config::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| CacheError::connection(format!("failed to create redis pool: {e}")))?;
        Ok(Self { pool })
    }

    async fn connection(&self) -> CacheResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::connection(format!("redis connection error: {e}")))
    }
}

#[async_trait]
impl ListingCache for RedisListingCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::backend(format!("redis GET error: {e}")))?;
        Ok(value)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        // SET with EX; sub-second TTLs round up to one second.
        let seconds = ttl.as_secs().max(1);
        let _: () = conn
            .set_ex(key, value, seconds)
            .await
            .map_err(|e| CacheError::backend(format!("redis SET error: {e}")))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .del(key)
            .await
            .map_err(|e| CacheError::backend(format!("redis DEL error: {e}")))?;
        tracing::debug!(key, "cache entry invalidated");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
