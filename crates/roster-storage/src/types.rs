//! Shared types for the storage abstraction layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A document as returned by a store backend: the assigned id plus the body.
///
/// The body is raw JSON; the domain layer decides what shape it has.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredDocument {
    /// Store-assigned unique identifier within the collection.
    pub id: String,
    /// The document body. Backends keep the `id` mirrored inside the body
    /// under the `"id"` key so projections stay self-contained.
    pub document: Value,
}

impl StoredDocument {
    /// Creates a stored document, mirroring the id into the body.
    #[must_use]
    pub fn new(id: impl Into<String>, mut document: Value) -> Self {
        let id = id.into();
        if let Some(map) = document.as_object_mut() {
            map.insert("id".to_string(), Value::String(id.clone()));
        }
        Self { id, document }
    }
}
