//! Product entity with embedded flavor and size variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::lenient;
use crate::resource::{Draft, Patch, Resource, Status};
use crate::slug::slug_or_derive;
use crate::variant::{Variant, VariantDraft, VariantList, VariantPatch, VariantSlot};

/// Catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    /// Category id (weak reference)
    pub category: Option<Uuid>,
    /// Brand id (weak reference)
    pub brand: Option<Uuid>,
    pub slug: String,
    pub status: Status,
    pub is_available: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<ProductFlavor>))]
    pub flavors: VariantList<ProductFlavor>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<ProductSize>))]
    pub sizes: VariantList<ProductSize>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Product {
    const COLLECTION: &'static str = "products";
    const LABEL: &'static str = "Product";
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "description"];
    const NAME_FIELD: Option<&'static str> = Some("title");
    const PRICE_FIELD: Option<&'static str> = Some("price");

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn media(&self) -> Vec<String> {
        let mut media = self.images.clone();
        media.extend(self.flavors.media());
        media
    }

    fn check(&self) -> DomainResult<()> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::validation("Price cannot be negative"));
        }
        if self.sizes.iter().any(|s| !s.price.is_finite() || s.price < 0.0) {
            return Err(DomainError::validation("Size price cannot be negative"));
        }
        Ok(())
    }
}

/// Flavor variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProductFlavor {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub is_available: bool,
}

impl Variant for ProductFlavor {
    const LABEL: &'static str = "Flavor";

    fn id(&self) -> Uuid {
        self.id
    }

    fn media(&self) -> Vec<String> {
        self.image.iter().cloned().collect()
    }
}

/// Size variant of a product, carrying its own price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProductSize {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub stock: Option<u32>,
    pub is_available: bool,
}

impl Variant for ProductSize {
    const LABEL: &'static str = "Size";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl VariantSlot<ProductFlavor> for Product {
    fn variants(&self) -> &VariantList<ProductFlavor> {
        &self.flavors
    }

    fn variants_mut(&mut self) -> &mut VariantList<ProductFlavor> {
        &mut self.flavors
    }
}

impl VariantSlot<ProductSize> for Product {
    fn variants(&self) -> &VariantList<ProductSize> {
        &self.sizes
    }

    fn variants_mut(&mut self) -> &mut VariantList<ProductSize> {
        &mut self.sizes
    }
}

/// Product creation input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    #[cfg_attr(feature = "openapi", schema(example = "Green Apple Juice"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[validate(
        required(message = "Price is required"),
        range(min = 0.0, message = "Price cannot be negative")
    )]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub images: Vec<String>,
    pub category: Option<Uuid>,
    pub brand: Option<Uuid>,
    pub slug: Option<String>,
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub is_available: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub tags: Vec<String>,
}

impl Draft for NewProduct {
    type Target = Product;

    fn into_resource(self, id: Uuid, now: DateTime<Utc>) -> Product {
        let slug = slug_or_derive(self.slug.as_deref(), &self.title);
        Product {
            id,
            title: self.title,
            description: self.description,
            price: self.price.unwrap_or_default(),
            images: self.images,
            category: self.category,
            brand: self.brand,
            slug,
            status: self.status.unwrap_or_default(),
            is_available: self.is_available.unwrap_or(true),
            featured: self.featured.unwrap_or(false),
            tags: self.tags,
            flavors: VariantList::new(),
            sizes: VariantList::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Product update input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProductChanges {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_strings")]
    pub images: Option<Vec<String>>,
    pub category: Option<Uuid>,
    pub brand: Option<Uuid>,
    pub slug: Option<String>,
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub is_available: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_strings")]
    pub tags: Option<Vec<String>>,
}

impl Patch for ProductChanges {
    type Target = Product;

    fn apply(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(images) = self.images {
            product.images = images;
        }
        if let Some(category) = self.category {
            product.category = Some(category);
        }
        if let Some(brand) = self.brand {
            product.brand = Some(brand);
        }
        if let Some(slug) = self.slug {
            product.slug = slug_or_derive(Some(&slug), &product.title);
        }
        if let Some(status) = self.status {
            product.status = status;
        }
        if let Some(is_available) = self.is_available {
            product.is_available = is_available;
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
        if let Some(tags) = self.tags {
            product.tags = tags;
        }
    }
}

/// Flavor variant creation input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewProductFlavor {
    #[serde(default)]
    #[validate(length(min = 1, message = "Flavor name is required"))]
    pub name: String,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub is_available: Option<bool>,
}

impl VariantDraft for NewProductFlavor {
    type Target = ProductFlavor;

    fn into_variant(self, id: Uuid) -> ProductFlavor {
        ProductFlavor {
            id,
            name: self.name,
            image: self.image,
            is_available: self.is_available.unwrap_or(true),
        }
    }
}

/// Flavor variant update input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProductFlavorChanges {
    #[validate(length(min = 1, message = "Flavor name cannot be empty"))]
    pub name: Option<String>,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub is_available: Option<bool>,
}

impl VariantPatch for ProductFlavorChanges {
    type Target = ProductFlavor;

    fn apply(self, flavor: &mut ProductFlavor) {
        if let Some(name) = self.name {
            flavor.name = name;
        }
        if let Some(image) = self.image {
            flavor.image = Some(image);
        }
        if let Some(is_available) = self.is_available {
            flavor.is_available = is_available;
        }
    }
}

/// Size variant creation input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewProductSize {
    #[serde(default)]
    #[validate(length(min = 1, message = "Size name is required"))]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[validate(
        required(message = "Price is required"),
        range(min = 0.0, message = "Price cannot be negative")
    )]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub stock: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub is_available: Option<bool>,
}

impl VariantDraft for NewProductSize {
    type Target = ProductSize;

    fn into_variant(self, id: Uuid) -> ProductSize {
        ProductSize {
            id,
            name: self.name,
            price: self.price.unwrap_or_default(),
            stock: self.stock,
            is_available: self.is_available.unwrap_or(true),
        }
    }
}

/// Size variant update input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProductSizeChanges {
    #[validate(length(min = 1, message = "Size name cannot be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub stock: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub is_available: Option<bool>,
}

impl VariantPatch for ProductSizeChanges {
    type Target = ProductSize;

    fn apply(self, size: &mut ProductSize) {
        if let Some(name) = self.name {
            size.name = name;
        }
        if let Some(price) = self.price {
            size.price = price;
        }
        if let Some(stock) = self.stock {
            size.stock = Some(stock);
        }
        if let Some(is_available) = self.is_available {
            size.is_available = is_available;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewProduct {
        NewProduct {
            title: "Green Apple Juice".into(),
            description: "Cold pressed".into(),
            price: Some(4.5),
            images: vec!["/uploads/apple.png".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_draft_defaults() {
        let now = Utc::now();
        let product = draft().into_resource(Uuid::new_v4(), now);

        assert_eq!(product.slug, "green-apple-juice");
        assert_eq!(product.status, Status::Active);
        assert!(product.is_available);
        assert_eq!(product.created_at, product.updated_at);
    }

    #[test]
    fn test_draft_requires_title_and_price() {
        let input: NewProduct = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn test_patch_changes_only_given_fields() {
        let mut product = draft().into_resource(Uuid::new_v4(), Utc::now());
        let before = product.clone();

        ProductChanges {
            price: Some(5.0),
            ..Default::default()
        }
        .apply(&mut product);

        assert_eq!(product.price, 5.0);
        assert_eq!(product.title, before.title);
        assert_eq!(product.images, before.images);
    }

    #[test]
    fn test_media_includes_flavor_images() {
        let mut product = draft().into_resource(Uuid::new_v4(), Utc::now());
        product
            .flavors
            .add(
                NewProductFlavor {
                    name: "Sour".into(),
                    image: Some("/uploads/sour.png".into()),
                    is_available: None,
                }
                .into_variant(Uuid::new_v4()),
            )
            .unwrap();

        assert_eq!(
            product.media(),
            vec!["/uploads/apple.png".to_string(), "/uploads/sour.png".to_string()]
        );
    }

    #[test]
    fn test_check_rejects_negative_price() {
        let mut product = draft().into_resource(Uuid::new_v4(), Utc::now());
        product.price = -1.0;
        assert!(product.check().is_err());
    }
}
