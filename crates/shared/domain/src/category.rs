//! Category entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::resource::{collect_media, Draft, Patch, Resource, Status, UniqueKey};
use crate::slug::slug_or_derive;

/// Product category. Slugs are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Category {
    const COLLECTION: &'static str = "categories";
    const LABEL: &'static str = "Category";
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

    fn unique_key(&self) -> Option<UniqueKey> {
        Some(UniqueKey::new("slug", &self.slug))
    }

    fn media(&self) -> Vec<String> {
        collect_media([self.image.as_ref()])
    }
}

/// Category creation input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub slug: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub image: Option<String>,
    pub status: Option<Status>,
}

impl Draft for NewCategory {
    type Target = Category;

    fn into_resource(self, id: Uuid, now: DateTime<Utc>) -> Category {
        let slug = slug_or_derive(self.slug.as_deref(), &self.name);
        Category {
            id,
            name: self.name,
            slug,
            description: self.description,
            image: self.image,
            status: self.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Category update input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CategoryChanges {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: Option<Status>,
}

impl Patch for CategoryChanges {
    type Target = Category;

    fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(slug) = self.slug {
            category.slug = slug_or_derive(Some(&slug), &category.name);
        }
        if let Some(description) = self.description {
            category.description = description;
        }
        if let Some(image) = self.image {
            category.image = Some(image);
        }
        if let Some(status) = self.status {
            category.status = status;
        }
    }
}
