//! List queries: filters, free-text search, ordering and pagination.
//!
//! A [`ListQuery`] is what callers build from request parameters. It is
//! resolved against a [`Resource`] type into a [`DocumentQuery`], which
//! names concrete document fields and is what the store backends execute.
//! Ordering is always total: ties fall back to the document id.

use std::cmp::Ordering;

use common::{PageMeta, Window};
use domain::Resource;
use serde_json::Value;

use crate::store::Document;

/// Public sort keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    CreatedAtAsc,
    #[default]
    CreatedAtDesc,
}

impl SortKey {
    /// Parse a sort parameter. Unknown values fall back to the default.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("name_asc") => SortKey::NameAsc,
            Some("name_desc") => SortKey::NameDesc,
            Some("price_asc") => SortKey::PriceAsc,
            Some("price_desc") => SortKey::PriceDesc,
            Some("createdAt_asc") => SortKey::CreatedAtAsc,
            Some("createdAt_desc") => SortKey::CreatedAtDesc,
            _ => SortKey::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::NameAsc => "name_asc",
            SortKey::NameDesc => "name_desc",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::CreatedAtAsc => "createdAt_asc",
            SortKey::CreatedAtDesc => "createdAt_desc",
        }
    }

    /// Map onto concrete fields of `T`. Keys the entity has no field for
    /// resolve to the default ordering.
    pub fn resolve<T: Resource>(self) -> SortSpec {
        let spec = match self {
            SortKey::NameAsc => T::NAME_FIELD.map(|f| (SortField::Text(f), Direction::Asc)),
            SortKey::NameDesc => T::NAME_FIELD.map(|f| (SortField::Text(f), Direction::Desc)),
            SortKey::PriceAsc => T::PRICE_FIELD.map(|f| (SortField::Number(f), Direction::Asc)),
            SortKey::PriceDesc => T::PRICE_FIELD.map(|f| (SortField::Number(f), Direction::Desc)),
            SortKey::CreatedAtAsc => Some((SortField::CreatedAt, Direction::Asc)),
            SortKey::CreatedAtDesc => Some((SortField::CreatedAt, Direction::Desc)),
        };
        let (field, direction) = spec.unwrap_or((SortField::CreatedAt, Direction::Desc));
        SortSpec { field, direction }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// What a sort compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    /// Body text field, compared case-insensitively
    Text(&'static str),
    /// Body numeric field
    Number(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: Direction,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: Direction::Desc,
        }
    }
}

/// Equality match on a top-level body field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Caller-facing list query.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    pub search: Option<String>,
    pub sort: SortKey,
    pub window: Window,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::eq(field, value));
        self
    }

    /// Add a filter only when a value is present.
    pub fn filter_opt<V: Into<Value>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.filter(field, value),
            None => self,
        }
    }

    /// Blank search terms are ignored.
    pub fn search(mut self, term: Option<&str>) -> Self {
        self.search = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        self
    }

    pub fn sort(mut self, key: SortKey) -> Self {
        self.sort = key;
        self
    }

    pub fn window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    pub fn resolve<T: Resource>(&self) -> DocumentQuery {
        DocumentQuery {
            filters: self.filters.clone(),
            search: self.search.as_ref().map(|term| Search {
                term: term.clone(),
                fields: T::SEARCH_FIELDS,
            }),
            sort: self.sort.resolve::<T>(),
            window: Some(self.window),
        }
    }
}

/// Case-insensitive substring match over a fixed set of text fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Search {
    pub term: String,
    pub fields: &'static [&'static str],
}

/// Backend-facing query over one collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    pub filters: Vec<Filter>,
    pub search: Option<Search>,
    pub sort: SortSpec,
    /// `None` returns every match
    pub window: Option<Window>,
}

impl DocumentQuery {
    /// Evaluate filters and search against one document.
    pub fn matches(&self, doc: &Document) -> bool {
        let filters_match = self
            .filters
            .iter()
            .all(|f| doc.body.get(&f.field) == Some(&f.value));
        if !filters_match {
            return false;
        }

        match &self.search {
            None => true,
            Some(search) => {
                let needle = search.term.to_lowercase();
                search.fields.iter().any(|field| {
                    doc.body
                        .get(*field)
                        .and_then(Value::as_str)
                        .map(|text| text.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                })
            }
        }
    }

    /// Total order used by in-process evaluation. Missing values sort
    /// before present ones in ascending order.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let primary = match self.sort.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Text(field) => text_key(a, field).cmp(&text_key(b, field)),
            SortField::Number(field) => number_key(a, field)
                .partial_cmp(&number_key(b, field))
                .unwrap_or(Ordering::Equal),
        };
        let primary = match self.sort.direction {
            Direction::Asc => primary,
            Direction::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

fn text_key(doc: &Document, field: &str) -> Option<String> {
    doc.body
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_lowercase)
}

fn number_key(doc: &Document, field: &str) -> Option<f64> {
    doc.body.get(field).and_then(Value::as_f64)
}

/// One window of matches plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub window: Window,
}

impl<T> Page<T> {
    pub fn meta(&self) -> PageMeta {
        PageMeta::new(self.window, self.total)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            window: self.window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use domain::{Brand, Product};
    use serde_json::json;
    use uuid::Uuid;

    fn doc(body: Value, age_secs: i64) -> Document {
        let at = Utc::now() - Duration::seconds(age_secs);
        Document {
            id: Uuid::new_v4(),
            collection: "products".into(),
            unique_key: None,
            body,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_unknown_sort_falls_back() {
        assert_eq!(SortKey::parse(Some("popularity")), SortKey::CreatedAtDesc);
        assert_eq!(SortKey::parse(None), SortKey::CreatedAtDesc);
        assert_eq!(SortKey::parse(Some("price_asc")), SortKey::PriceAsc);
    }

    #[test]
    fn test_sort_key_missing_field_falls_back() {
        assert_eq!(SortKey::PriceAsc.resolve::<Brand>(), SortSpec::default());
        assert_eq!(
            SortKey::PriceAsc.resolve::<Product>(),
            SortSpec {
                field: SortField::Number("price"),
                direction: Direction::Asc
            }
        );
        assert_eq!(
            SortKey::NameDesc.resolve::<Product>().field,
            SortField::Text("title")
        );
    }

    #[test]
    fn test_search_is_case_insensitive_over_fields() {
        let query = ListQuery::new().search(Some("APPLE")).resolve::<Product>();
        assert!(query.matches(&doc(json!({"title": "Green apple", "description": ""}), 0)));
        assert!(query.matches(&doc(json!({"title": "Juice", "description": "pineapple"}), 0)));
        assert!(!query.matches(&doc(json!({"title": "Mango", "description": "sweet"}), 0)));
    }

    #[test]
    fn test_blank_search_ignored() {
        let query = ListQuery::new().search(Some("   "));
        assert_eq!(query.search, None);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let query = ListQuery::new()
            .filter("status", "active")
            .filter("isAvailable", true)
            .resolve::<Product>();
        assert!(query.matches(&doc(json!({"status": "active", "isAvailable": true}), 0)));
        assert!(!query.matches(&doc(json!({"status": "active", "isAvailable": false}), 0)));
    }

    #[test]
    fn test_ties_broken_by_id() {
        let query = ListQuery::new().sort(SortKey::PriceAsc).resolve::<Product>();
        let a = doc(json!({"price": 1.0}), 0);
        let b = doc(json!({"price": 1.0}), 0);
        let expected = a.id.cmp(&b.id);
        assert_eq!(query.compare(&a, &b), expected);
    }

    #[test]
    fn test_created_at_desc_default_order() {
        let query = ListQuery::new().resolve::<Product>();
        let older = doc(json!({}), 60);
        let newer = doc(json!({}), 0);
        assert_eq!(query.compare(&newer, &older), Ordering::Less);
    }
}
