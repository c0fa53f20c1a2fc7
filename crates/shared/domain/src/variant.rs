//! Embedded variant collections.
//!
//! A variant is a sub-document owned by exactly one parent resource. The
//! parent holds a [`VariantList`]; variants have no existence outside it and
//! are dropped together with the parent.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::resource::Resource;

/// A sub-document embedded in a parent resource.
pub trait Variant: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Label used in "<Label> not found".
    const LABEL: &'static str;

    fn id(&self) -> Uuid;

    fn media(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Create input for a variant.
pub trait VariantDraft: Validate + DeserializeOwned + Send {
    type Target: Variant;

    fn into_variant(self, id: Uuid) -> Self::Target;
}

/// Partial update input for a variant.
pub trait VariantPatch: Validate + DeserializeOwned + Send {
    type Target: Variant;

    fn apply(self, target: &mut Self::Target);
}

/// A parent resource exposing one embedded variant list.
///
/// A resource may implement this for several variant types
/// (a product owns both flavor and size variants).
pub trait VariantSlot<V: Variant>: Resource {
    fn variants(&self) -> &VariantList<V>;

    fn variants_mut(&mut self) -> &mut VariantList<V>;
}

/// Ordered collection of variants keyed by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantList<V>(Vec<V>);

impl<V> Default for VariantList<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V: Variant> VariantList<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.0.iter()
    }

    pub fn get(&self, id: Uuid) -> Option<&V> {
        self.0.iter().find(|v| v.id() == id)
    }

    /// Append a variant. Ids are unique within a list.
    pub fn add(&mut self, variant: V) -> DomainResult<()> {
        if self.get(variant.id()).is_some() {
            return Err(DomainError::conflict(format!("{} id", V::LABEL)));
        }
        self.0.push(variant);
        Ok(())
    }

    /// Mutate the variant with `id` in place.
    pub fn update<F>(&mut self, id: Uuid, f: F) -> DomainResult<&V>
    where
        F: FnOnce(&mut V),
    {
        let variant = self
            .0
            .iter_mut()
            .find(|v| v.id() == id)
            .ok_or_else(|| DomainError::not_found(V::LABEL))?;
        f(variant);
        Ok(variant)
    }

    /// Remove the variant with `id`. Removing an absent id is an error.
    pub fn remove(&mut self, id: Uuid) -> DomainResult<V> {
        let index = self
            .0
            .iter()
            .position(|v| v.id() == id)
            .ok_or_else(|| DomainError::not_found(V::LABEL))?;
        Ok(self.0.remove(index))
    }

    /// Media referenced by all variants in the list.
    pub fn media(&self) -> Vec<String> {
        self.0.iter().flat_map(Variant::media).collect()
    }
}

impl<V> From<Vec<V>> for VariantList<V> {
    fn from(items: Vec<V>) -> Self {
        Self(items)
    }
}

impl<'a, V> IntoIterator for &'a VariantList<V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Swatch {
        id: Uuid,
        image: Option<String>,
    }

    impl Variant for Swatch {
        const LABEL: &'static str = "Swatch";

        fn id(&self) -> Uuid {
            self.id
        }

        fn media(&self) -> Vec<String> {
            self.image.iter().cloned().collect()
        }
    }

    fn swatch(image: Option<&str>) -> Swatch {
        Swatch {
            id: Uuid::new_v4(),
            image: image.map(str::to_string),
        }
    }

    #[test]
    fn test_add_and_get() {
        let mut list = VariantList::new();
        let s = swatch(None);
        list.add(s.clone()).unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list.get(s.id), Some(&s));
    }

    #[test]
    fn test_add_duplicate_id_rejected() {
        let mut list = VariantList::new();
        let s = swatch(None);
        list.add(s.clone()).unwrap();

        assert!(matches!(list.add(s), Err(DomainError::Conflict(_))));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_update_in_place() {
        let mut list = VariantList::new();
        let s = swatch(None);
        list.add(s.clone()).unwrap();

        let updated = list
            .update(s.id, |v| v.image = Some("/uploads/a.png".into()))
            .unwrap();
        assert_eq!(updated.image.as_deref(), Some("/uploads/a.png"));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut list: VariantList<Swatch> = VariantList::new();
        let err = list.update(Uuid::new_v4(), |_| {}).unwrap_err();
        assert_eq!(err, DomainError::NotFound("Swatch".into()));
    }

    #[test]
    fn test_remove_twice_fails() {
        let mut list = VariantList::new();
        let s = swatch(None);
        list.add(s.clone()).unwrap();

        assert_eq!(list.remove(s.id).unwrap(), s);
        assert!(matches!(list.remove(s.id), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_media_collects_all_variants() {
        let list = VariantList::from(vec![
            swatch(Some("/uploads/a.png")),
            swatch(None),
            swatch(Some("/uploads/b.png")),
        ]);

        assert_eq!(list.media(), vec!["/uploads/a.png", "/uploads/b.png"]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let list = VariantList::from(vec![swatch(None)]);
        let json = serde_json::to_value(&list).unwrap();
        assert!(json.is_array());
    }
}
