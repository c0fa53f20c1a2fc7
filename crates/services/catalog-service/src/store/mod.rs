//! Document persistence.
//!
//! Every resource is stored as a JSON document in a named collection. The
//! [`DocumentStore`] trait is the only thing the rest of the crate knows
//! about persistence; [`PostgresStore`] and [`MemoryStore`] implement it
//! with the same semantics.

pub mod entities;
mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::StoreBackend;
use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::query::DocumentQuery;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub collection: String,
    /// Normalized uniqueness value; unique per collection when present
    pub unique_key: Option<String>,
    pub body: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    fn backend(&self) -> StoreBackend;

    /// Round-trip to the backend.
    async fn ping(&self) -> StoreResult<()>;

    /// Insert a new document. Fails with `DuplicateKey` when the unique key
    /// is taken within the collection.
    async fn insert(&self, doc: Document) -> StoreResult<()>;

    async fn get(&self, collection: &str, id: Uuid) -> StoreResult<Option<Document>>;

    /// Find the document holding `key` in `collection`.
    async fn find_unique(&self, collection: &str, key: &str) -> StoreResult<Option<Document>>;

    /// Overwrite body, unique key and `updated_at` of an existing document.
    /// Returns `false` when no such document exists.
    async fn replace(&self, doc: Document) -> StoreResult<bool>;

    /// Returns `false` when no such document exists.
    async fn delete(&self, collection: &str, id: Uuid) -> StoreResult<bool>;

    /// Matching documents in query order, windowed, plus the total match count.
    async fn find(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> StoreResult<(Vec<Document>, u64)>;
}
