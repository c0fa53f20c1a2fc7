//! Service offerings shown on the marketing site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::lenient;
use crate::resource::{collect_media, Draft, Patch, Resource, Status};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffering {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for ServiceOffering {
    const COLLECTION: &'static str = "services";
    const LABEL: &'static str = "Service";
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "description"];
    const NAME_FIELD: Option<&'static str> = Some("title");

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
        collect_media([self.image.as_ref()])
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewServiceOffering {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub features: Vec<String>,
    pub status: Option<Status>,
}

impl Draft for NewServiceOffering {
    type Target = ServiceOffering;

    fn into_resource(self, id: Uuid, now: DateTime<Utc>) -> ServiceOffering {
        ServiceOffering {
            id,
            title: self.title,
            description: self.description,
            image: self.image,
            features: self.features,
            status: self.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ServiceOfferingChanges {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_strings")]
    pub features: Option<Vec<String>>,
    pub status: Option<Status>,
}

impl Patch for ServiceOfferingChanges {
    type Target = ServiceOffering;

    fn apply(self, offering: &mut ServiceOffering) {
        if let Some(title) = self.title {
            offering.title = title;
        }
        if let Some(description) = self.description {
            offering.description = description;
        }
        if let Some(image) = self.image {
            offering.image = Some(image);
        }
        if let Some(features) = self.features {
            offering.features = features;
        }
        if let Some(status) = self.status {
            offering.status = status;
        }
    }
}
