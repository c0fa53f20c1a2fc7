//! Brand entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::resource::{collect_media, Draft, Patch, Resource, Status, UniqueKey};
use crate::slug::slug_or_derive;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Brand {
    const COLLECTION: &'static str = "brands";
    const LABEL: &'static str = "Brand";
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
        Some(UniqueKey::new("name", &self.name))
    }

    fn media(&self) -> Vec<String> {
        collect_media([self.logo.as_ref()])
    }
}

/// Brand creation input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewBrand {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
    pub status: Option<Status>,
}

impl Draft for NewBrand {
    type Target = Brand;

    fn into_resource(self, id: Uuid, now: DateTime<Utc>) -> Brand {
        let slug = slug_or_derive(self.slug.as_deref(), &self.name);
        Brand {
            id,
            name: self.name.trim().to_string(),
            slug,
            description: self.description,
            logo: self.logo,
            website: self.website,
            status: self.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Brand update input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BrandChanges {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
    pub status: Option<Status>,
}

impl Patch for BrandChanges {
    type Target = Brand;

    fn apply(self, brand: &mut Brand) {
        if let Some(name) = self.name {
            brand.name = name.trim().to_string();
        }
        if let Some(slug) = self.slug {
            brand.slug = slug_or_derive(Some(&slug), &brand.name);
        }
        if let Some(description) = self.description {
            brand.description = Some(description);
        }
        if let Some(logo) = self.logo {
            brand.logo = Some(logo);
        }
        if let Some(website) = self.website {
            brand.website = Some(website);
        }
        if let Some(status) = self.status {
            brand.status = status;
        }
    }
}
