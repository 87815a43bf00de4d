//! In-memory document store backed by DashMap.
//!
//! Intended for tests and local development; the production deployment
//! points the same [`DocumentStore`] port at a real document database.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

use roster_storage::{DocumentStore, StorageError, StorageResult, StoredDocument};

pub type StorageKey = String; // Format: "collection/id"

pub(crate) fn make_storage_key(collection: &str, id: &str) -> StorageKey {
    format!("{collection}/{id}")
}

/// In-memory document store using a concurrent hash map.
///
/// Per-document writes are atomic (one map entry); there is no coordination
/// across documents, matching what the abstraction guarantees.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    data: Arc<DashMap<StorageKey, Value>>,
}

impl MemoryDocumentStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    /// Number of documents in a collection. Test helper.
    #[must_use]
    pub fn collection_len(&self, collection: &str) -> usize {
        let prefix = format!("{collection}/");
        self.data.iter().filter(|e| e.key().starts_with(&prefix)).count()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: &str, document: &Value) -> StorageResult<StoredDocument> {
        if !document.is_object() {
            return Err(StorageError::invalid_document(
                "document body must be a JSON object",
            ));
        }
        let id = uuid::Uuid::new_v4().to_string();
        let stored = StoredDocument::new(id.clone(), document.clone());
        self.data
            .insert(make_storage_key(collection, &id), stored.document.clone());
        Ok(stored)
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> StorageResult<Option<StoredDocument>> {
        let key = make_storage_key(collection, id);
        Ok(self.data.get(&key).map(|entry| StoredDocument {
            id: id.to_string(),
            document: entry.value().clone(),
        }))
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StorageResult<Vec<StoredDocument>> {
        let prefix = format!("{collection}/");
        let mut matches = Vec::new();
        for entry in self.data.iter() {
            if !entry.key().starts_with(&prefix) {
                continue;
            }
            if entry.value().get(field) == Some(value) {
                let id = entry.key()[prefix.len()..].to_string();
                matches.push(StoredDocument {
                    id,
                    document: entry.value().clone(),
                });
            }
        }
        Ok(matches)
    }

    async fn list(&self, collection: &str) -> StorageResult<Vec<StoredDocument>> {
        let prefix = format!("{collection}/");
        let mut documents = Vec::new();
        for entry in self.data.iter() {
            if let Some(id) = entry.key().strip_prefix(&prefix) {
                documents.push(StoredDocument {
                    id: id.to_string(),
                    document: entry.value().clone(),
                });
            }
        }
        Ok(documents)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: &Value,
    ) -> StorageResult<StoredDocument> {
        let key = make_storage_key(collection, id);
        let mut entry = self
            .data
            .get_mut(&key)
            .ok_or_else(|| StorageError::not_found(collection, id))?;

        let (Some(target), Some(source)) = (entry.value_mut().as_object_mut(), patch.as_object())
        else {
            return Err(StorageError::invalid_document(
                "update requires JSON objects on both sides",
            ));
        };
        for (k, v) in source {
            target.insert(k.clone(), v.clone());
        }
        // The id key is not writable through a patch.
        target.insert("id".to_string(), Value::String(id.to_string()));

        Ok(StoredDocument {
            id: id.to_string(),
            document: entry.value().clone(),
        })
    }

    async fn delete(&self, collection: &str, id: &str) -> StorageResult<()> {
        let key = make_storage_key(collection, id);
        match self.data.remove(&key) {
            Some(_) => Ok(()),
            None => Err(StorageError::not_found(collection, id)),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_id_and_mirrors_it() {
        let store = MemoryDocumentStore::new();
        let created = store
            .insert("users", &json!({"email": "a@b.c"}))
            .await
            .unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.document["id"], json!(created.id));

        let found = store.find_by_id("users", &created.id).await.unwrap();
        assert_eq!(found.unwrap().document["email"], json!("a@b.c"));
    }

    #[tokio::test]
    async fn test_insert_rejects_non_object() {
        let store = MemoryDocumentStore::new();
        let err = store.insert("users", &json!("scalar")).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidDocument { .. }));
    }

    #[tokio::test]
    async fn test_find_by_field() {
        let store = MemoryDocumentStore::new();
        store
            .insert("users", &json!({"email": "a@b.c", "name": "A"}))
            .await
            .unwrap();
        store
            .insert("users", &json!({"email": "x@y.z", "name": "X"}))
            .await
            .unwrap();

        let hits = store
            .find_by_field("users", "email", &json!("a@b.c"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document["name"], json!("A"));

        let none = store
            .find_by_field("users", "email", &json!("missing@b.c"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = MemoryDocumentStore::new();
        store.insert("users", &json!({"email": "a@b.c"})).await.unwrap();
        store.insert("posts", &json!({"title": "hi"})).await.unwrap();

        assert_eq!(store.list("users").await.unwrap().len(), 1);
        assert_eq!(store.list("posts").await.unwrap().len(), 1);
        assert_eq!(store.collection_len("users"), 1);
    }

    #[tokio::test]
    async fn test_update_merges_shallow() {
        let store = MemoryDocumentStore::new();
        let created = store
            .insert("users", &json!({"email": "a@b.c", "name": "Old", "city": "Oslo"}))
            .await
            .unwrap();

        let updated = store
            .update("users", &created.id, &json!({"name": "New"}))
            .await
            .unwrap();
        assert_eq!(updated.document["name"], json!("New"));
        assert_eq!(updated.document["city"], json!("Oslo"));
        assert_eq!(updated.document["id"], json!(created.id));
    }

    #[tokio::test]
    async fn test_update_cannot_rewrite_id() {
        let store = MemoryDocumentStore::new();
        let created = store.insert("users", &json!({"email": "a@b.c"})).await.unwrap();

        let updated = store
            .update("users", &created.id, &json!({"id": "forged"}))
            .await
            .unwrap();
        assert_eq!(updated.document["id"], json!(created.id));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryDocumentStore::new();
        let err = store
            .update("users", "nope", &json!({"name": "X"}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryDocumentStore::new();
        let created = store.insert("users", &json!({"email": "a@b.c"})).await.unwrap();

        store.delete("users", &created.id).await.unwrap();
        assert!(store.find_by_id("users", &created.id).await.unwrap().is_none());

        let err = store.delete("users", &created.id).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
