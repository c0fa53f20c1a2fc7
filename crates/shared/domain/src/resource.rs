//! Resource abstraction shared by every persisted catalog entity.
//!
//! A resource is a JSON document stored in a named collection. The trait
//! describes the fixed shape knowledge the store and query engine need
//! (collection, searchable fields, sortable fields, uniqueness, media
//! references) without coupling entities to any storage backend.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainResult;

/// A uniqueness constraint value for a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    /// Field name as it appears in messages ("name", "email", "slug").
    pub field: &'static str,
    /// Normalized value (trimmed, lower-cased).
    pub value: String,
}

impl UniqueKey {
    pub fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.trim().to_lowercase(),
        }
    }
}

/// Top-level persisted entity.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection the documents live in.
    const COLLECTION: &'static str;

    /// Human-readable label, used in "<Label> not found".
    const LABEL: &'static str;

    /// Text fields matched by free-text search.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Field backing the `name_*` sort keys.
    const NAME_FIELD: Option<&'static str> = None;

    /// Field backing the `price_*` sort keys.
    const PRICE_FIELD: Option<&'static str> = None;

    fn id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> DateTime<Utc>;

    /// Record a modification at `now`.
    fn touch(&mut self, now: DateTime<Utc>);

    /// Value of the entity's uniqueness constraint, if it has one.
    fn unique_key(&self) -> Option<UniqueKey> {
        None
    }

    /// Uploaded media referenced by this resource, embedded variants included.
    fn media(&self) -> Vec<String> {
        Vec::new()
    }

    /// Invariants that must hold after every create and update.
    fn check(&self) -> DomainResult<()> {
        Ok(())
    }
}

/// Create input for a resource.
pub trait Draft: Validate + DeserializeOwned + Send {
    type Target: Resource;

    /// Build the resource with system-assigned id and timestamps.
    fn into_resource(self, id: Uuid, now: DateTime<Utc>) -> Self::Target;
}

/// Partial update input for a resource. Absent fields are left unchanged.
pub trait Patch: Validate + DeserializeOwned + Send {
    type Target: Resource;

    fn apply(self, target: &mut Self::Target);
}

/// Lifecycle flag shared by catalog entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Inactive,
    Discontinued,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
            Status::Discontinued => "discontinued",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = crate::error::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Status::Active),
            "inactive" => Ok(Status::Inactive),
            "discontinued" => Ok(Status::Discontinued),
            other => Err(crate::error::DomainError::validation(format!(
                "Invalid status '{}'",
                other
            ))),
        }
    }
}

/// Flatten optional media references.
pub(crate) fn collect_media<'a>(paths: impl IntoIterator<Item = Option<&'a String>>) -> Vec<String> {
    paths.into_iter().flatten().cloned().collect()
}
