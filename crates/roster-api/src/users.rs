//! The user service: account CRUD, login, the cache-aside directory
//! listing with explicit invalidation, and the activity feed.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, warn};

use roster_auth::{CredentialVerifier, LoginOutcome, TokenService, hash_password};
use roster_core::{AccountRecord, CoreError, USERS_COLLECTION, strip_sensitive_fields};
use roster_storage::{DynCache, DynStore};

use crate::error::ApiResult;

/// The single fixed cache key holding the serialized full user listing.
pub const USERS_LISTING_KEY: &str = "users:all";

/// Default listing TTL: one hour.
pub const DEFAULT_LISTING_TTL: Duration = Duration::from_secs(3600);

/// Top-level fields that a profile update may not rewrite.
const PROTECTED_FIELDS: &[&str] = &[
    "id",
    "email",
    "password_hash",
    "passwordHash",
    "role",
    "created_at",
];

/// Collections aggregated by the activity feed, queried in this order.
const FEED_COLLECTIONS: [&str; 3] = ["posts", "comments", "votes"];

/// Account-creation input: credentials plus arbitrary extra profile fields.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

/// The three parallel lists returned by the activity feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityFeed {
    pub posts: Vec<Value>,
    pub comments: Vec<Value>,
    pub votes: Vec<Value>,
}

/// All user-account operations.
///
/// Write paths talk only to the authoritative store (deletion additionally
/// invalidates the listing cache); the listing read path consults the cache
/// first; login talks only to the store and the token issuer.
pub struct UserService {
    store: DynStore,
    cache: DynCache,
    verifier: CredentialVerifier,
    listing_ttl: Duration,
}

impl UserService {
    /// Creates the service over the given store, cache, and token service.
    #[must_use]
    pub fn new(store: DynStore, cache: DynCache, tokens: TokenService) -> Self {
        let verifier = CredentialVerifier::new(store.clone(), tokens);
        Self {
            store,
            cache,
            verifier,
            listing_ttl: DEFAULT_LISTING_TTL,
        }
    }

    /// Overrides the listing TTL (configuration hook).
    #[must_use]
    pub fn with_listing_ttl(mut self, ttl: Duration) -> Self {
        self.listing_ttl = ttl;
        self
    }

    /// Creates an account.
    ///
    /// Email uniqueness is enforced by query-before-insert; two concurrent
    /// creations with the same email can both pass the check before either
    /// writes. That window is inherited behavior, kept rather than papered
    /// over with a lock the store does not give us.
    ///
    /// Does not invalidate the listing cache: a new account appears in the
    /// cached listing only after the TTL lapses.
    ///
    /// # Errors
    ///
    /// `CoreError::Conflict` if the email is already registered.
    pub async fn create_user(&self, new: NewAccount) -> ApiResult<Value> {
        if new.email.is_empty() || new.password.is_empty() {
            return Err(CoreError::invalid_account("email and password are required").into());
        }

        let existing = self
            .store
            .find_by_field(USERS_COLLECTION, "email", &json!(new.email))
            .await?;
        if !existing.is_empty() {
            return Err(CoreError::conflict(new.email).into());
        }

        let mut account = AccountRecord::new(&new.email, hash_password(&new.password)?);
        for (key, value) in new.profile {
            if !PROTECTED_FIELDS.contains(&key.as_str()) && key != "updated_at" {
                account.profile.insert(key, value);
            }
        }

        let document = serde_json::to_value(&account).map_err(CoreError::from)?;
        let stored = self.store.insert(USERS_COLLECTION, &document).await?;
        info!(account_id = %stored.id, "account created");

        let mut profile = stored.document;
        strip_sensitive_fields(&mut profile);
        Ok(profile)
    }

    /// Returns the full public user listing, cache-aside.
    ///
    /// Cache hit: deserialize and return with no store access. Cache miss:
    /// rebuild from the store, repopulate the cache with the listing TTL,
    /// and return the fresh result. A cache fault on read is logged and
    /// treated as a miss; a fault on the repopulating write is logged and
    /// swallowed (the response is already correct from the store).
    ///
    /// Concurrent misses may each read the store and race on the cache
    /// write; last writer wins and no locking is attempted.
    pub async fn list_users(&self) -> ApiResult<Vec<Value>> {
        match self.cache.get(USERS_LISTING_KEY).await {
            Ok(Some(serialized)) => match serde_json::from_str::<Vec<Value>>(&serialized) {
                Ok(listing) => {
                    debug!(key = USERS_LISTING_KEY, "listing served from cache");
                    return Ok(listing);
                }
                Err(e) => {
                    warn!(error = %e, "cached listing is corrupt, rebuilding from store");
                }
            },
            Ok(None) => {
                debug!(key = USERS_LISTING_KEY, "listing cache miss");
            }
            Err(e) => {
                // Best-effort cache: a read fault degrades to a store read.
                warn!(error = %e, "listing cache read failed, falling back to store");
            }
        }

        let documents = self.store.list(USERS_COLLECTION).await?;
        let listing: Vec<Value> = documents
            .into_iter()
            .map(|stored| {
                let mut doc = stored.document;
                strip_sensitive_fields(&mut doc);
                doc
            })
            .collect();

        let serialized = serde_json::to_string(&listing).map_err(CoreError::from)?;
        if let Err(e) = self
            .cache
            .set_with_ttl(USERS_LISTING_KEY, &serialized, self.listing_ttl)
            .await
        {
            warn!(error = %e, "failed to repopulate listing cache");
        }

        Ok(listing)
    }

    /// Verifies credentials and issues an access token.
    ///
    /// Never touches the cache and never mutates the store.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginOutcome> {
        Ok(self.verifier.login(email, password).await?)
    }

    /// Returns one account's public profile.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` if the id does not exist.
    pub async fn get_user(&self, id: &str) -> ApiResult<Value> {
        let stored = self
            .store
            .find_by_id(USERS_COLLECTION, id)
            .await?
            .ok_or_else(|| CoreError::not_found(id))?;

        let mut profile = stored.document;
        strip_sensitive_fields(&mut profile);
        Ok(profile)
    }

    /// Merges the supplied profile fields into an account.
    ///
    /// Identity and credential fields are not writable through this path;
    /// a patch naming one is rejected outright rather than partially
    /// applied, so callers learn about the restriction instead of getting
    /// a 200 that quietly ignored half their input. Refreshes `updated_at`.
    /// Does not invalidate the listing cache, so an edit shows up in the
    /// cached listing only after the TTL lapses.
    ///
    /// # Errors
    ///
    /// `CoreError::InvalidAccount` if the patch names a protected field;
    /// `CoreError::NotFound` if the id does not exist.
    pub async fn update_user(&self, id: &str, fields: Map<String, Value>) -> ApiResult<Value> {
        if let Some(key) = fields
            .keys()
            .find(|k| PROTECTED_FIELDS.contains(&k.as_str()))
        {
            return Err(
                CoreError::invalid_account(format!("field '{key}' is not updatable")).into(),
            );
        }

        // Existence check next, then the merge, in that written order.
        if self.store.find_by_id(USERS_COLLECTION, id).await?.is_none() {
            return Err(CoreError::not_found(id).into());
        }

        let mut patch = fields;
        patch.insert("updated_at".to_string(), json!(now_rfc3339()?));

        let updated = self
            .store
            .update(USERS_COLLECTION, id, &Value::Object(patch))
            .await?;
        info!(account_id = %id, "account updated");

        let mut profile = updated.document;
        strip_sensitive_fields(&mut profile);
        Ok(profile)
    }

    /// Deletes an account and invalidates the cached listing.
    ///
    /// The cache key is removed only after the store delete succeeds, so
    /// the next listing read is forced to miss and rebuild. Deleting a
    /// nonexistent id fails with `NotFound` and performs neither step.
    pub async fn delete_user(&self, id: &str) -> ApiResult<()> {
        self.store
            .delete(USERS_COLLECTION, id)
            .await
            .map_err(|e| missing_as_not_found(e, id))?;

        // Invalidation is a correctness step here, not best-effort: a fault
        // propagates rather than leaving the deleted account cached.
        self.cache.delete(USERS_LISTING_KEY).await?;
        info!(account_id = %id, "account deleted, listing cache invalidated");
        Ok(())
    }

    /// Replaces an account's password hash and refreshes `updated_at`.
    ///
    /// Never touches the listing cache: the password hash is stripped from
    /// listings regardless.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` if the id does not exist.
    pub async fn change_password(&self, id: &str, new_password: &str) -> ApiResult<()> {
        if new_password.is_empty() {
            return Err(CoreError::invalid_account("password is required").into());
        }
        if self.store.find_by_id(USERS_COLLECTION, id).await?.is_none() {
            return Err(CoreError::not_found(id).into());
        }

        let patch = json!({
            "password_hash": hash_password(new_password)?,
            "updated_at": now_rfc3339()?,
        });
        self.store.update(USERS_COLLECTION, id, &patch).await?;
        info!(account_id = %id, "password changed");
        Ok(())
    }

    /// Aggregates an account's activity: posts, comments, and votes.
    ///
    /// Three independent collection reads, issued sequentially (each
    /// completes before the next begins). No cache involved and no
    /// existence check on the id; an unknown account yields empty lists.
    pub async fn activity_feed(&self, id: &str) -> ApiResult<ActivityFeed> {
        let mut lists: Vec<Vec<Value>> = Vec::with_capacity(FEED_COLLECTIONS.len());
        for collection in FEED_COLLECTIONS {
            let documents = self
                .store
                .find_by_field(collection, "user_id", &json!(id))
                .await?;
            lists.push(documents.into_iter().map(|d| d.document).collect());
        }
        let mut lists = lists.into_iter();
        Ok(ActivityFeed {
            posts: lists.next().unwrap_or_default(),
            comments: lists.next().unwrap_or_default(),
            votes: lists.next().unwrap_or_default(),
        })
    }
}

fn now_rfc3339() -> Result<String, CoreError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| CoreError::configuration(format!("timestamp formatting failed: {e}")))
}

fn missing_as_not_found(err: roster_storage::StorageError, id: &str) -> crate::error::ApiError {
    if err.is_not_found() {
        CoreError::not_found(id).into()
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use roster_auth::verify_password;
    use roster_db_memory::{MemoryDocumentStore, MemoryListingCache};
    use roster_storage::{
        CacheError, CacheResult, DocumentStore, ListingCache, StorageResult, StoredDocument,
    };

    use crate::error::ApiError;

    /// Store wrapper counting read operations, for cache-hit assertions.
    struct CountingStore {
        inner: Arc<MemoryDocumentStore>,
        reads: AtomicUsize,
    }

    impl CountingStore {
        fn new(inner: Arc<MemoryDocumentStore>) -> Self {
            Self {
                inner,
                reads: AtomicUsize::new(0),
            }
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentStore for CountingStore {
        async fn insert(&self, collection: &str, document: &Value) -> StorageResult<StoredDocument> {
            self.inner.insert(collection, document).await
        }

        async fn find_by_id(
            &self,
            collection: &str,
            id: &str,
        ) -> StorageResult<Option<StoredDocument>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_id(collection, id).await
        }

        async fn find_by_field(
            &self,
            collection: &str,
            field: &str,
            value: &Value,
        ) -> StorageResult<Vec<StoredDocument>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_field(collection, field, value).await
        }

        async fn list(&self, collection: &str) -> StorageResult<Vec<StoredDocument>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.list(collection).await
        }

        async fn update(
            &self,
            collection: &str,
            id: &str,
            patch: &Value,
        ) -> StorageResult<StoredDocument> {
            self.inner.update(collection, id, patch).await
        }

        async fn delete(&self, collection: &str, id: &str) -> StorageResult<()> {
            self.inner.delete(collection, id).await
        }

        fn backend_name(&self) -> &'static str {
            "memory-counting"
        }
    }

    /// Cache whose every operation fails, for fault-path assertions.
    struct FaultyCache;

    #[async_trait]
    impl ListingCache for FaultyCache {
        async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
            Err(CacheError::connection("cache unreachable"))
        }

        async fn set_with_ttl(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
            Err(CacheError::connection("cache unreachable"))
        }

        async fn delete(&self, _key: &str) -> CacheResult<()> {
            Err(CacheError::connection("cache unreachable"))
        }

        fn backend_name(&self) -> &'static str {
            "memory-faulty"
        }
    }

    fn tokens() -> TokenService {
        TokenService::new("test-secret", "roster-test", time::Duration::hours(1))
    }

    fn service() -> (UserService, Arc<MemoryDocumentStore>, Arc<MemoryListingCache>) {
        let store = Arc::new(MemoryDocumentStore::new());
        let cache = Arc::new(MemoryListingCache::new());
        let svc = UserService::new(store.clone(), cache.clone(), tokens());
        (svc, store, cache)
    }

    fn counting_service() -> (UserService, Arc<CountingStore>, Arc<MemoryListingCache>) {
        let store = Arc::new(CountingStore::new(Arc::new(MemoryDocumentStore::new())));
        let cache = Arc::new(MemoryListingCache::new());
        let svc = UserService::new(store.clone(), cache.clone(), tokens());
        (svc, store, cache)
    }

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            email: email.to_string(),
            password: "hunter2".to_string(),
            profile: Map::new(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict_with_one_record() {
        let (svc, store, _) = service();

        svc.create_user(new_account("a@b.c")).await.unwrap();
        let err = svc.create_user(new_account("a@b.c")).await.unwrap_err();

        assert_eq!(err.status_code(), 409);
        assert_eq!(store.collection_len(USERS_COLLECTION), 1);
    }

    #[tokio::test]
    async fn test_login_token_embeds_id_and_role() {
        let (svc, _, _) = service();
        let created = svc.create_user(new_account("a@b.c")).await.unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let outcome = svc.login("a@b.c", "hunter2").await.unwrap();
        let claims = svc.verifier.tokens().decode(&outcome.token).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, roster_core::Role::Member);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (svc, _, _) = service();
        svc.create_user(new_account("a@b.c")).await.unwrap();

        let wrong_password = svc.login("a@b.c", "nope").await.unwrap_err();
        let unknown_email = svc.login("ghost@b.c", "nope").await.unwrap_err();

        assert_eq!(wrong_password.status_code(), 401);
        assert_eq!(unknown_email.status_code(), 401);
        assert_eq!(wrong_password.message(), unknown_email.message());
    }

    #[tokio::test]
    async fn test_warm_listing_skips_the_store() {
        let (svc, store, _) = counting_service();
        svc.create_user(new_account("a@b.c")).await.unwrap();

        let first = svc.list_users().await.unwrap();
        let reads_after_first = store.reads();

        let second = svc.list_users().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.reads(), reads_after_first, "cache hit must not read the store");
    }

    #[tokio::test]
    async fn test_listing_strips_password_hash() {
        let (svc, _, _) = service();
        svc.create_user(new_account("a@b.c")).await.unwrap();

        let listing = svc.list_users().await.unwrap();
        assert_eq!(listing.len(), 1);
        assert!(listing[0].get("password_hash").is_none());
        assert_eq!(listing[0]["email"], json!("a@b.c"));
    }

    #[tokio::test]
    async fn test_delete_invalidates_warm_listing() {
        let (svc, _, _) = service();
        let kept = svc.create_user(new_account("keep@b.c")).await.unwrap();
        let doomed = svc.create_user(new_account("doom@b.c")).await.unwrap();
        let _ = kept;

        let warm = svc.list_users().await.unwrap();
        assert_eq!(warm.len(), 2);

        let doomed_id = doomed["id"].as_str().unwrap();
        svc.delete_user(doomed_id).await.unwrap();

        let fresh = svc.list_users().await.unwrap();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0]["email"], json!("keep@b.c"));
    }

    #[tokio::test]
    async fn test_create_does_not_invalidate_listing() {
        // Deliberate asymmetry: only deletion invalidates. A new account is
        // invisible in the warm listing until the TTL lapses.
        let (svc, _, _) = service();
        svc.create_user(new_account("first@b.c")).await.unwrap();

        let warm = svc.list_users().await.unwrap();
        assert_eq!(warm.len(), 1);

        svc.create_user(new_account("second@b.c")).await.unwrap();
        let still_warm = svc.list_users().await.unwrap();
        assert_eq!(still_warm.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_id_operations_are_not_found_and_do_not_mutate() {
        let (svc, store, _) = service();
        svc.create_user(new_account("a@b.c")).await.unwrap();
        let snapshot = store.list(USERS_COLLECTION).await.unwrap();

        let update = svc
            .update_user("ghost", Map::from_iter([("name".to_string(), json!("X"))]))
            .await
            .unwrap_err();
        let delete = svc.delete_user("ghost").await.unwrap_err();
        let password = svc.change_password("ghost", "newpass").await.unwrap_err();

        for err in [&update, &delete, &password] {
            assert_eq!(err.status_code(), 404);
        }
        assert_eq!(store.list(USERS_COLLECTION).await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let (svc, _, _) = service();
        let mut account = new_account("a@b.c");
        account
            .profile
            .insert("name".to_string(), json!("Test User"));

        let created = svc.create_user(account).await.unwrap();
        let id = created["id"].as_str().unwrap();
        let fetched = svc.get_user(id).await.unwrap();

        assert_eq!(fetched["email"], json!("a@b.c"));
        assert_eq!(fetched["name"], json!("Test User"));
        assert_eq!(fetched["role"], json!("member"));
        assert!(fetched.get("password_hash").is_none());
        assert!(fetched["created_at"].is_string());
        assert!(fetched["updated_at"].is_string());
    }

    #[tokio::test]
    async fn test_get_missing_user_is_not_found() {
        let (svc, _, _) = service();
        let err = svc.get_user("ghost").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert!(matches!(err, ApiError::Core(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_merges_profile_fields() {
        let (svc, store, _) = service();
        let created = svc.create_user(new_account("a@b.c")).await.unwrap();
        let id = created["id"].as_str().unwrap();

        let fields = Map::from_iter([
            ("name".to_string(), json!("New Name")),
            ("city".to_string(), json!("Oslo")),
        ]);
        let updated = svc.update_user(id, fields).await.unwrap();

        assert_eq!(updated["name"], json!("New Name"));
        assert_eq!(updated["city"], json!("Oslo"));
        assert_eq!(updated["email"], json!("a@b.c"));

        let raw = store.find_by_id(USERS_COLLECTION, id).await.unwrap().unwrap();
        assert!(
            raw.document["updated_at"].as_str().unwrap()
                >= raw.document["created_at"].as_str().unwrap()
        );
    }

    #[tokio::test]
    async fn test_update_rejects_protected_fields() {
        let (svc, store, _) = service();
        let created = svc.create_user(new_account("a@b.c")).await.unwrap();
        let id = created["id"].as_str().unwrap();

        for key in ["id", "email", "password_hash", "passwordHash", "role", "created_at"] {
            let fields = Map::from_iter([
                ("name".to_string(), json!("New Name")),
                (key.to_string(), json!("forged")),
            ]);
            let err = svc.update_user(id, fields).await.unwrap_err();
            assert_eq!(err.status_code(), 400, "field '{key}' must be rejected");
        }

        // Nothing from the rejected patches landed, name included.
        let raw = store.find_by_id(USERS_COLLECTION, id).await.unwrap().unwrap();
        assert!(raw.document.get("name").is_none());
        assert_eq!(raw.document["email"], json!("a@b.c"));
        assert_eq!(raw.document["role"], json!("member"));
    }

    #[tokio::test]
    async fn test_change_password_stores_verifying_hash() {
        let (svc, store, _) = service();
        let created = svc.create_user(new_account("a@b.c")).await.unwrap();
        let id = created["id"].as_str().unwrap();

        svc.change_password(id, "correct horse").await.unwrap();

        let raw = store.find_by_id(USERS_COLLECTION, id).await.unwrap().unwrap();
        let hash = raw.document["password_hash"].as_str().unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", hash).unwrap());

        // Old password no longer works, new one does.
        assert_eq!(svc.login("a@b.c", "hunter2").await.unwrap_err().status_code(), 401);
        svc.login("a@b.c", "correct horse").await.unwrap();
    }

    #[tokio::test]
    async fn test_activity_feed_aggregates_three_collections() {
        let (svc, store, _) = service();
        let created = svc.create_user(new_account("a@b.c")).await.unwrap();
        let id = created["id"].as_str().unwrap();

        store
            .insert("posts", &json!({"user_id": id, "title": "Hello"}))
            .await
            .unwrap();
        store
            .insert("comments", &json!({"user_id": id, "body": "Nice"}))
            .await
            .unwrap();
        store
            .insert("comments", &json!({"user_id": "someone-else", "body": "Not mine"}))
            .await
            .unwrap();
        store
            .insert("votes", &json!({"user_id": id, "up": true}))
            .await
            .unwrap();

        let feed = svc.activity_feed(id).await.unwrap();
        assert_eq!(feed.posts.len(), 1);
        assert_eq!(feed.comments.len(), 1);
        assert_eq!(feed.votes.len(), 1);
        assert_eq!(feed.posts[0]["title"], json!("Hello"));
    }

    #[tokio::test]
    async fn test_activity_feed_for_unknown_id_is_empty() {
        let (svc, _, _) = service();
        let feed = svc.activity_feed("ghost").await.unwrap();
        assert!(feed.posts.is_empty());
        assert!(feed.comments.is_empty());
        assert!(feed.votes.is_empty());
    }

    #[tokio::test]
    async fn test_listing_survives_cache_wipe() {
        // The cache may be wiped at any time without breaking correctness.
        let (svc, _, cache) = service();
        svc.create_user(new_account("a@b.c")).await.unwrap();

        svc.list_users().await.unwrap();
        cache.delete(USERS_LISTING_KEY).await.unwrap();

        let listing = svc.list_users().await.unwrap();
        assert_eq!(listing.len(), 1);
    }

    fn faulty_cache_service() -> (UserService, Arc<MemoryDocumentStore>) {
        let store = Arc::new(MemoryDocumentStore::new());
        let svc = UserService::new(store.clone(), Arc::new(FaultyCache), tokens());
        (svc, store)
    }

    #[tokio::test]
    async fn test_cache_faults_degrade_listing_to_store() {
        // A cache that errors on read and write must not break the listing;
        // every call falls back to the store.
        let (svc, _) = faulty_cache_service();
        svc.create_user(new_account("a@b.c")).await.unwrap();

        let first = svc.list_users().await.unwrap();
        let second = svc.list_users().await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_cache_delete_fault_fails_the_delete() {
        // Invalidation failing after the store delete must surface as a
        // fault, not as a 200 that leaves the deleted account cached.
        let (svc, store) = faulty_cache_service();
        let created = svc.create_user(new_account("a@b.c")).await.unwrap();
        let id = created["id"].as_str().unwrap();

        let err = svc.delete_user(id).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(matches!(err, ApiError::Cache(_)));

        // The store delete had already happened when invalidation failed.
        assert!(store.find_by_id(USERS_COLLECTION, id).await.unwrap().is_none());
    }
}
