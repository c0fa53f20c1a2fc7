//! Typed access to one resource collection.
//!
//! [`Repository`] turns domain resources into store documents and back, and
//! owns the write-path rules every resource shares: input validation,
//! uniqueness, timestamps, invariant checks and cleanup of media files that
//! are no longer referenced.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use common::{AppError, AppResult, OptionExt, Window};
use domain::{Draft, Patch, Resource};
use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreError;
use crate::media::MediaStore;
use crate::query::{DocumentQuery, ListQuery, Page};
use crate::store::{Document, DocumentStore};

pub struct Repository<T: Resource> {
    store: Arc<dyn DocumentStore>,
    media: Arc<dyn MediaStore>,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            media: self.media.clone(),
            _resource: PhantomData,
        }
    }
}

impl<T: Resource> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>, media: Arc<dyn MediaStore>) -> Self {
        Self {
            store,
            media,
            _resource: PhantomData,
        }
    }

    /// Validate a create input and insert the resource it builds.
    pub async fn create<D>(&self, draft: D) -> AppResult<T>
    where
        D: Draft<Target = T>,
    {
        draft.validate()?;
        let resource = draft.into_resource(Uuid::new_v4(), Utc::now());
        self.insert(resource).await
    }

    /// Insert an already-built resource.
    pub async fn insert(&self, resource: T) -> AppResult<T> {
        resource.check()?;
        self.ensure_unique(&resource).await?;

        let doc = to_document(&resource)?;
        self.store
            .insert(doc)
            .await
            .map_err(|e| self.store_error(e, &resource))?;

        tracing::info!(collection = T::COLLECTION, id = %resource.id(), "Created");
        Ok(resource)
    }

    pub async fn find(&self, id: Uuid) -> AppResult<Option<T>> {
        self.store
            .get(T::COLLECTION, id)
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn get(&self, id: Uuid) -> AppResult<T> {
        self.find(id).await?.ok_or_not_found(T::LABEL)
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<Page<T>> {
        let resolved = query.resolve::<T>();
        let (docs, total) = self.store.find(T::COLLECTION, &resolved).await?;
        Ok(Page {
            items: docs.into_iter().map(from_document).collect::<AppResult<_>>()?,
            total,
            window: query.window,
        })
    }

    /// Every resource whose body field equals `value`, in default order.
    pub async fn find_by_field(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> AppResult<Vec<T>> {
        let query = ListQuery::new().filter(field, value).resolve::<T>();
        let query = DocumentQuery {
            window: None,
            ..query
        };
        let (docs, _) = self.store.find(T::COLLECTION, &query).await?;
        docs.into_iter().map(from_document).collect()
    }

    /// First resource whose body field equals `value`.
    pub async fn find_one(&self, field: &str, value: impl Into<Value>) -> AppResult<Option<T>> {
        let query = ListQuery::new()
            .filter(field, value)
            .window(Window::new(0, 1));
        Ok(self.list(&query).await?.items.into_iter().next())
    }

    /// Validate a partial update and merge it into the stored resource.
    pub async fn update<P>(&self, id: Uuid, patch: P) -> AppResult<T>
    where
        P: Patch<Target = T>,
    {
        patch.validate()?;
        self.modify(id, |resource| {
            patch.apply(resource);
            Ok(())
        })
        .await
    }

    /// Load, mutate and write back a resource.
    ///
    /// Bumps `updatedAt`, re-checks invariants and uniqueness, and deletes
    /// media the mutation stopped referencing.
    pub async fn modify<F>(&self, id: Uuid, mutate: F) -> AppResult<T>
    where
        F: FnOnce(&mut T) -> AppResult<()>,
    {
        let mut resource = self.get(id).await?;
        let before = resource.media();

        mutate(&mut resource)?;
        resource.touch(Utc::now().max(resource.created_at()));
        resource.check()?;
        self.ensure_unique(&resource).await?;

        let doc = to_document(&resource)?;
        let replaced = self
            .store
            .replace(doc)
            .await
            .map_err(|e| self.store_error(e, &resource))?;
        if !replaced {
            return Err(AppError::not_found(T::LABEL));
        }

        let after = resource.media();
        let stale: Vec<String> = before.into_iter().filter(|m| !after.contains(m)).collect();
        self.discard_media(&stale).await;

        tracing::info!(collection = T::COLLECTION, id = %id, "Updated");
        Ok(resource)
    }

    /// Remove a resource together with its embedded variants and, best
    /// effort, the media it references.
    pub async fn delete(&self, id: Uuid) -> AppResult<T> {
        let resource = self.get(id).await?;
        if !self.store.delete(T::COLLECTION, id).await? {
            return Err(AppError::not_found(T::LABEL));
        }
        self.discard_media(&resource.media()).await;

        tracing::info!(collection = T::COLLECTION, id = %id, "Deleted");
        Ok(resource)
    }

    async fn ensure_unique(&self, resource: &T) -> AppResult<()> {
        let Some(key) = resource.unique_key() else {
            return Ok(());
        };
        match self.store.find_unique(T::COLLECTION, &key.value).await? {
            Some(existing) if existing.id != resource.id() => {
                Err(AppError::conflict(format!("{} {}", T::LABEL, key.field)))
            }
            _ => Ok(()),
        }
    }

    /// Media deletion never fails the request.
    async fn discard_media(&self, paths: &[String]) {
        for path in paths {
            if let Err(e) = self.media.remove(path).await {
                tracing::warn!(
                    collection = T::COLLECTION,
                    path = %path,
                    error = %e,
                    "Failed to delete media file"
                );
            }
        }
    }

    /// Translate a write failure, naming the unique field on a race lost
    /// to a concurrent insert.
    fn store_error(&self, err: StoreError, resource: &T) -> AppError {
        match (err, resource.unique_key()) {
            (StoreError::DuplicateKey { .. }, Some(key)) => {
                AppError::conflict(format!("{} {}", T::LABEL, key.field))
            }
            (err, _) => err.into(),
        }
    }
}

fn to_document<T: Resource>(resource: &T) -> AppResult<Document> {
    Ok(Document {
        id: resource.id(),
        collection: T::COLLECTION.to_string(),
        unique_key: resource.unique_key().map(|k| k.value),
        body: serde_json::to_value(resource).map_err(StoreError::from)?,
        created_at: resource.created_at(),
        updated_at: resource.updated_at(),
    })
}

fn from_document<T: Resource>(doc: Document) -> AppResult<T> {
    Ok(serde_json::from_value(doc.body).map_err(StoreError::from)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MockMediaStore;
    use crate::store::{MemoryStore, MockDocumentStore};
    use domain::{
        Flavor, NewFlavor, NewProduct, NewSize, Product, ProductChanges, Size, SizeChanges,
        Status,
    };

    fn quiet_media() -> Arc<dyn MediaStore> {
        let mut media = MockMediaStore::new();
        media.expect_remove().returning(|_| Ok(()));
        Arc::new(media)
    }

    fn sizes() -> Repository<Size> {
        Repository::new(MemoryStore::new_shared(), quiet_media())
    }

    fn large() -> NewSize {
        NewSize {
            name: "Large".into(),
            description: "1L bottle".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let repo = sizes();
        let size = repo.create(large()).await.unwrap();

        assert_eq!(size.created_at, size.updated_at);
        assert!(size.is_available);
        assert_eq!(size.status, Status::Active);
        assert_eq!(repo.get(size.id).await.unwrap(), size);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected_case_insensitively() {
        let repo = sizes();
        repo.create(large()).await.unwrap();

        let mut again = large();
        again.name = " LARGE ".into();
        let err = repo.create(again).await.unwrap_err();
        assert_eq!(err.user_message(), "Size name already exists");

        let page = repo.list(&ListQuery::new()).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_missing_required_field_is_validation_error() {
        let repo = sizes();
        let err = repo
            .create(NewSize {
                name: "Small".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Description is required"));
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() {
        let repo = sizes();
        let size = repo.create(large()).await.unwrap();

        let updated = repo
            .update(
                size.id,
                SizeChanges {
                    description: Some("1.5L bottle".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.description, "1.5L bottle");
        assert_eq!(updated.name, size.name);
        assert_eq!(updated.created_at, size.created_at);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_update_into_taken_name_rejected() {
        let repo = sizes();
        repo.create(large()).await.unwrap();
        let small = repo
            .create(NewSize {
                name: "Small".into(),
                description: "330ml".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let err = repo
            .update(
                small.id,
                SizeChanges {
                    name: Some("large".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(repo.get(small.id).await.unwrap().name, "Small");
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let repo = sizes();
        let id = Uuid::new_v4();
        assert!(matches!(repo.get(id).await, Err(AppError::NotFound(ref l)) if l == "Size"));
        assert!(matches!(repo.delete(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            repo.update(id, SizeChanges::default()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_replaced_media_is_removed() {
        let mut media = MockMediaStore::new();
        media
            .expect_remove()
            .withf(|path| path.to_string() == "/uploads/old.png")
            .times(1)
            .returning(|_| Ok(()));
        let repo: Repository<Product> = Repository::new(MemoryStore::new_shared(), Arc::new(media));

        let product = repo
            .create(NewProduct {
                title: "Apple".into(),
                description: "Juice".into(),
                price: Some(2.0),
                images: vec!["/uploads/old.png".into(), "/uploads/keep.png".into()],
                ..Default::default()
            })
            .await
            .unwrap();

        repo.update(
            product.id,
            ProductChanges {
                images: Some(vec!["/uploads/keep.png".into(), "/uploads/new.png".into()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_delete_survives_media_failure() {
        let mut media = MockMediaStore::new();
        media
            .expect_remove()
            .times(1)
            .returning(|_| Err(AppError::internal("disk gone")));
        let repo: Repository<Flavor> =
            Repository::new(MemoryStore::new_shared(), Arc::new(media));

        let flavor = repo
            .create(NewFlavor {
                name: "Mango".into(),
                description: "Sweet".into(),
                image: Some("/uploads/mango.png".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        repo.delete(flavor.id).await.unwrap();
        assert!(repo.find(flavor.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pagination_windows_are_disjoint() {
        let repo: Repository<Product> =
            Repository::new(MemoryStore::new_shared(), quiet_media());
        for i in 0..7 {
            repo.create(NewProduct {
                title: format!("Product {}", i),
                description: "d".into(),
                price: Some(1.0),
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let page = |offset, limit| {
            let repo = repo.clone();
            async move {
                repo.list(&ListQuery::new().window(Window::new(offset, limit)))
                    .await
                    .unwrap()
            }
        };
        let first = page(0, 3).await;
        let second = page(3, 3).await;
        let both = page(0, 6).await;

        assert_eq!(first.total, 7);
        let ids = |p: &Page<Product>| p.items.iter().map(|x| x.id).collect::<Vec<_>>();
        let mut joined = ids(&first);
        joined.extend(ids(&second));
        assert_eq!(joined, ids(&both));
    }

    #[tokio::test]
    async fn test_find_one_by_field() {
        let repo: Repository<Product> =
            Repository::new(MemoryStore::new_shared(), quiet_media());
        let product = repo
            .create(NewProduct {
                title: "Green Apple".into(),
                description: "d".into(),
                price: Some(1.0),
                ..Default::default()
            })
            .await
            .unwrap();

        let found = repo.find_one("slug", "green-apple").await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(product.id));
        assert!(repo.find_one("slug", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_outage_maps_to_unavailable() {
        let mut store = MockDocumentStore::new();
        store
            .expect_get()
            .returning(|_, _| Err(StoreError::Unavailable("connection refused".into())));
        let repo: Repository<Size> = Repository::new(Arc::new(store), quiet_media());

        let err = repo.get(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.status().as_u16(), 503);
    }
}
