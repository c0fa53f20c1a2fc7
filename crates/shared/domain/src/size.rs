//! Size catalog entry (reusable size definitions).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::lenient;
use crate::resource::{Draft, Patch, Resource, Status, UniqueKey};

/// Size definition. Names are unique, case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Size {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_available: bool,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Size {
    const COLLECTION: &'static str = "sizes";
    const LABEL: &'static str = "Size";
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
}

/// Size creation input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewSize {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    #[cfg_attr(feature = "openapi", schema(example = "Large"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    #[cfg_attr(feature = "openapi", schema(example = "1L bottle"))]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub is_available: Option<bool>,
    pub status: Option<Status>,
}

impl Draft for NewSize {
    type Target = Size;

    fn into_resource(self, id: Uuid, now: DateTime<Utc>) -> Size {
        Size {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            is_available: self.is_available.unwrap_or(true),
            status: self.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Size update input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SizeChanges {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub is_available: Option<bool>,
    pub status: Option<Status>,
}

impl Patch for SizeChanges {
    type Target = Size;

    fn apply(self, size: &mut Size) {
        if let Some(name) = self.name {
            size.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            size.description = description;
        }
        if let Some(is_available) = self.is_available {
            size.is_available = is_available;
        }
        if let Some(status) = self.status {
            size.status = status;
        }
    }
}
