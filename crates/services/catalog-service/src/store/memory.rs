//! In-memory document store for tests and local development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::StoreBackend;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Document, DocumentStore};
use crate::error::{StoreError, StoreResult};
use crate::query::DocumentQuery;

type Collection = HashMap<Uuid, Document>;

/// In-memory implementation of [`DocumentStore`].
///
/// Reads are a linear scan of the collection; the same filter, search and
/// ordering rules as the SQL backend are applied in process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

fn key_taken(collection: &Collection, doc: &Document) -> bool {
    match &doc.unique_key {
        None => false,
        Some(key) => collection
            .values()
            .any(|other| other.id != doc.id && other.unique_key.as_ref() == Some(key)),
    }
}

fn duplicate(doc: &Document) -> StoreError {
    StoreError::DuplicateKey {
        collection: doc.collection.clone(),
        key: doc.unique_key.clone().unwrap_or_default(),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Memory
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert(&self, doc: Document) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let collection = collections.entry(doc.collection.clone()).or_default();

        if collection.contains_key(&doc.id) || key_taken(collection, &doc) {
            return Err(duplicate(&doc));
        }
        collection.insert(doc.id, doc);
        Ok(())
    }

    async fn get(&self, collection: &str, id: Uuid) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|c| c.get(&id))
            .cloned())
    }

    async fn find_unique(&self, collection: &str, key: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|c| {
            c.values()
                .find(|doc| doc.unique_key.as_deref() == Some(key))
                .cloned()
        }))
    }

    async fn replace(&self, doc: Document) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(collection) = collections.get_mut(&doc.collection) else {
            return Ok(false);
        };
        if !collection.contains_key(&doc.id) {
            return Ok(false);
        }
        if key_taken(collection, &doc) {
            return Err(duplicate(&doc));
        }

        if let Some(existing) = collection.get_mut(&doc.id) {
            existing.body = doc.body;
            existing.unique_key = doc.unique_key;
            existing.updated_at = doc.updated_at;
        }
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: Uuid) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .and_then(|c| c.remove(&id))
            .is_some())
    }

    async fn find(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> StoreResult<(Vec<Document>, u64)> {
        let collections = self.collections.read().await;
        let mut matches: Vec<Document> = collections
            .get(collection)
            .map(|c| c.values().filter(|doc| query.matches(doc)).cloned().collect())
            .unwrap_or_default();
        drop(collections);

        matches.sort_by(|a, b| query.compare(a, b));
        let total = matches.len() as u64;

        let items = match query.window {
            Some(window) => matches
                .into_iter()
                .skip(window.offset as usize)
                .take(window.limit as usize)
                .collect(),
            None => matches,
        };
        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::Window;
    use serde_json::json;

    fn doc(collection: &str, key: Option<&str>) -> Document {
        let now = Utc::now();
        Document {
            id: Uuid::new_v4(),
            collection: collection.into(),
            unique_key: key.map(str::to_string),
            body: json!({"name": key.unwrap_or("x")}),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_unique_key_scoped_to_collection() {
        let store = MemoryStore::new();
        store.insert(doc("sizes", Some("large"))).await.unwrap();
        store.insert(doc("brands", Some("large"))).await.unwrap();

        let err = store.insert(doc("sizes", Some("large"))).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn test_replace_and_delete_missing() {
        let store = MemoryStore::new();
        assert!(!store.replace(doc("sizes", None)).await.unwrap());
        assert!(!store.delete("sizes", Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_keeps_created_at() {
        let store = MemoryStore::new();
        let original = doc("sizes", Some("small"));
        store.insert(original.clone()).await.unwrap();

        let mut changed = original.clone();
        changed.body = json!({"name": "tiny"});
        changed.unique_key = Some("tiny".into());
        changed.created_at = Utc::now();
        changed.updated_at = Utc::now();
        assert!(store.replace(changed).await.unwrap());

        let stored = store.get("sizes", original.id).await.unwrap().unwrap();
        assert_eq!(stored.created_at, original.created_at);
        assert_eq!(stored.body["name"], "tiny");
        assert!(store.find_unique("sizes", "small").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_windows_and_counts() {
        let store = MemoryStore::new();
        for _ in 0..5 {
            store.insert(doc("sizes", None)).await.unwrap();
        }
        let query = DocumentQuery {
            window: Some(Window::new(3, 3)),
            ..Default::default()
        };
        let (items, total) = store.find("sizes", &query).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(items.len(), 2);
    }
}
