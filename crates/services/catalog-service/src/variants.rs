//! Embedded variant management.
//!
//! Variants live inside their parent document, so every operation is a
//! read-modify-write of the parent through [`Repository::modify`]. That
//! also gives variant edits the parent's timestamp and media cleanup rules.

use std::marker::PhantomData;

use common::AppResult;
use domain::{Variant, VariantDraft, VariantPatch, VariantSlot};
use uuid::Uuid;

use crate::repository::Repository;

/// Add, update and remove one kind of variant on one kind of parent.
pub struct VariantManager<P: VariantSlot<V>, V: Variant> {
    parents: Repository<P>,
    _variant: PhantomData<fn() -> V>,
}

impl<P: VariantSlot<V>, V: Variant> Clone for VariantManager<P, V> {
    fn clone(&self) -> Self {
        Self {
            parents: self.parents.clone(),
            _variant: PhantomData,
        }
    }
}

impl<P: VariantSlot<V>, V: Variant> VariantManager<P, V> {
    pub fn new(parents: Repository<P>) -> Self {
        Self {
            parents,
            _variant: PhantomData,
        }
    }

    /// Append a variant with a fresh id. Returns the updated parent.
    pub async fn add<D>(&self, parent_id: Uuid, draft: D) -> AppResult<P>
    where
        D: VariantDraft<Target = V>,
    {
        draft.validate()?;
        let variant = draft.into_variant(Uuid::new_v4());
        self.parents
            .modify(parent_id, |parent| {
                parent.variants_mut().add(variant)?;
                Ok(())
            })
            .await
    }

    /// Merge the given fields into one variant.
    pub async fn update<C>(&self, parent_id: Uuid, variant_id: Uuid, changes: C) -> AppResult<P>
    where
        C: VariantPatch<Target = V>,
    {
        changes.validate()?;
        self.parents
            .modify(parent_id, |parent| {
                parent
                    .variants_mut()
                    .update(variant_id, |variant| changes.apply(variant))?;
                Ok(())
            })
            .await
    }

    /// Remove one variant. Removing it again fails with not-found.
    pub async fn remove(&self, parent_id: Uuid, variant_id: Uuid) -> AppResult<P> {
        self.parents
            .modify(parent_id, |parent| {
                parent.variants_mut().remove(variant_id)?;
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use common::AppError;
    use domain::{
        Flavor, FlavorSize, FlavorSizeChanges, NewFlavor, NewFlavorSize, NewProduct,
        NewProductFlavor, Product, ProductFlavor,
    };

    use crate::media::MockMediaStore;
    use crate::store::MemoryStore;

    fn flavors(media: MockMediaStore) -> (Repository<Flavor>, VariantManager<Flavor, FlavorSize>) {
        let repo = Repository::new(MemoryStore::new_shared(), Arc::new(media));
        (repo.clone(), VariantManager::new(repo))
    }

    async fn mango(repo: &Repository<Flavor>) -> Flavor {
        repo.create(NewFlavor {
            name: "Mango".into(),
            description: "Sweet".into(),
            ..Default::default()
        })
        .await
        .unwrap()
    }

    fn half_litre() -> NewFlavorSize {
        NewFlavorSize {
            name: "500ml".into(),
            price: Some(3.5),
            image: Some("/uploads/500.png".into()),
            is_available: None,
        }
    }

    #[tokio::test]
    async fn test_add_assigns_fresh_ids() {
        let (repo, sizes) = flavors(MockMediaStore::new());
        let flavor = mango(&repo).await;

        let once = sizes.add(flavor.id, half_litre()).await.unwrap();
        let twice = sizes.add(flavor.id, half_litre()).await.unwrap();

        assert_eq!(once.sizes.len(), 1);
        assert_eq!(twice.sizes.len(), 2);
        let ids: Vec<_> = twice.sizes.iter().map(|s| s.id).collect();
        assert_ne!(ids[0], ids[1]);
        assert!(twice.sizes.iter().all(|s| s.is_available));
    }

    #[tokio::test]
    async fn test_add_to_missing_parent() {
        let (_, sizes) = flavors(MockMediaStore::new());
        let err = sizes.add(Uuid::new_v4(), half_litre()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref l) if l == "Flavor"));
    }

    #[tokio::test]
    async fn test_update_variant_replaces_image() {
        let mut media = MockMediaStore::new();
        media
            .expect_remove()
            .withf(|path| path.to_string() == "/uploads/500.png")
            .times(1)
            .returning(|_| Ok(()));
        let (repo, sizes) = flavors(media);
        let flavor = mango(&repo).await;
        let flavor = sizes.add(flavor.id, half_litre()).await.unwrap();
        let size_id = flavor.sizes.iter().next().map(|s| s.id).unwrap();

        let updated = sizes
            .update(
                flavor.id,
                size_id,
                FlavorSizeChanges {
                    price: Some(4.0),
                    image: Some("/uploads/500-v2.png".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let size = updated.sizes.get(size_id).unwrap();
        assert_eq!(size.price, 4.0);
        assert_eq!(size.name, "500ml");
    }

    #[tokio::test]
    async fn test_remove_twice_is_not_found() {
        let mut media = MockMediaStore::new();
        media.expect_remove().returning(|_| Ok(()));
        let (repo, sizes) = flavors(media);
        let flavor = mango(&repo).await;
        let flavor = sizes.add(flavor.id, half_litre()).await.unwrap();
        let size_id = flavor.sizes.iter().next().map(|s| s.id).unwrap();

        let after = sizes.remove(flavor.id, size_id).await.unwrap();
        assert!(after.sizes.is_empty());

        let err = sizes.remove(flavor.id, size_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref l) if l == "Size"));
    }

    #[tokio::test]
    async fn test_parent_delete_takes_variants() {
        let mut media = MockMediaStore::new();
        media.expect_remove().returning(|_| Ok(()));
        let repo: Repository<Product> = Repository::new(MemoryStore::new_shared(), Arc::new(media));
        let product_flavors: VariantManager<Product, ProductFlavor> =
            VariantManager::new(repo.clone());

        let product = repo
            .create(NewProduct {
                title: "Juice".into(),
                description: "Fresh".into(),
                price: Some(2.0),
                ..Default::default()
            })
            .await
            .unwrap();
        product_flavors
            .add(
                product.id,
                NewProductFlavor {
                    name: "Apple".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        repo.delete(product.id).await.unwrap();
        assert!(matches!(
            repo.get(product.id).await,
            Err(AppError::NotFound(_))
        ));
        let err = product_flavors
            .add(product.id, NewProductFlavor {
                name: "Pear".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
