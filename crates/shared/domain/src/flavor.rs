//! Flavor entity with an embedded size/price list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::lenient;
use crate::resource::{collect_media, Draft, Patch, Resource, Status};
use crate::variant::{Variant, VariantDraft, VariantList, VariantPatch, VariantSlot};

/// Flavor definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Flavor {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub status: Status,
    pub is_available: bool,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<FlavorSize>))]
    pub sizes: VariantList<FlavorSize>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Flavor {
    const COLLECTION: &'static str = "flavors";
    const LABEL: &'static str = "Flavor";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "description"];
    const NAME_FIELD: Option<&'static str> = Some("name");

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
        let mut media = collect_media([self.image.as_ref()]);
        media.extend(self.sizes.media());
        media
    }

    fn check(&self) -> DomainResult<()> {
        if self.sizes.iter().any(|s| !s.price.is_finite() || s.price < 0.0) {
            return Err(DomainError::validation("Size price cannot be negative"));
        }
        Ok(())
    }
}

/// A size offered for a flavor, with its price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FlavorSize {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub image: Option<String>,
    pub is_available: bool,
}

impl Variant for FlavorSize {
    const LABEL: &'static str = "Size";

    fn id(&self) -> Uuid {
        self.id
    }

    fn media(&self) -> Vec<String> {
        self.image.iter().cloned().collect()
    }
}

impl VariantSlot<FlavorSize> for Flavor {
    fn variants(&self) -> &VariantList<FlavorSize> {
        &self.sizes
    }

    fn variants_mut(&mut self) -> &mut VariantList<FlavorSize> {
        &mut self.sizes
    }
}

/// Flavor creation input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewFlavor {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    #[cfg_attr(feature = "openapi", schema(example = "Mango"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub image: Option<String>,
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub is_available: Option<bool>,
}

impl Draft for NewFlavor {
    type Target = Flavor;

    fn into_resource(self, id: Uuid, now: DateTime<Utc>) -> Flavor {
        Flavor {
            id,
            name: self.name,
            description: self.description,
            image: self.image,
            status: self.status.unwrap_or_default(),
            is_available: self.is_available.unwrap_or(true),
            sizes: VariantList::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Flavor update input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FlavorChanges {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub is_available: Option<bool>,
}

impl Patch for FlavorChanges {
    type Target = Flavor;

    fn apply(self, flavor: &mut Flavor) {
        if let Some(name) = self.name {
            flavor.name = name;
        }
        if let Some(description) = self.description {
            flavor.description = description;
        }
        if let Some(image) = self.image {
            flavor.image = Some(image);
        }
        if let Some(status) = self.status {
            flavor.status = status;
        }
        if let Some(is_available) = self.is_available {
            flavor.is_available = is_available;
        }
    }
}

/// Flavor size creation input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewFlavorSize {
    #[serde(default)]
    #[validate(length(min = 1, message = "Size name is required"))]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[validate(
        required(message = "Price is required"),
        range(min = 0.0, message = "Price cannot be negative")
    )]
    pub price: Option<f64>,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub is_available: Option<bool>,
}

impl VariantDraft for NewFlavorSize {
    type Target = FlavorSize;

    fn into_variant(self, id: Uuid) -> FlavorSize {
        FlavorSize {
            id,
            name: self.name,
            price: self.price.unwrap_or_default(),
            image: self.image,
            is_available: self.is_available.unwrap_or(true),
        }
    }
}

/// Flavor size update input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FlavorSizeChanges {
    #[validate(length(min = 1, message = "Size name cannot be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub is_available: Option<bool>,
}

impl VariantPatch for FlavorSizeChanges {
    type Target = FlavorSize;

    fn apply(self, size: &mut FlavorSize) {
        if let Some(name) = self.name {
            size.name = name;
        }
        if let Some(price) = self.price {
            size.price = price;
        }
        if let Some(image) = self.image {
            size.image = Some(image);
        }
        if let Some(is_available) = self.is_available {
            size.is_available = is_available;
        }
    }
}
