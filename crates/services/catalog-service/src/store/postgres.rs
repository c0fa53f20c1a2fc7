//! PostgreSQL document store on SeaORM.
//!
//! All collections share the `documents` table. Bodies are `jsonb`;
//! equality filters use containment (`@>`), search uses `ILIKE` over
//! extracted text fields, and sorting casts the extracted field.

use async_trait::async_trait;
use common::StoreBackend;
use sea_orm::sea_query::{Expr, NullOrdering, Order, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, Statement,
};
use serde_json::{json, Map};
use uuid::Uuid;

use super::entities::document::{self, ActiveModel, Entity as DocumentEntity};
use super::{Document, DocumentStore};
use crate::error::{StoreError, StoreResult};
use crate::query::{Direction, DocumentQuery, SortField};

/// SeaORM-backed implementation of [`DocumentStore`].
#[derive(Clone)]
pub struct PostgresStore {
    db: DatabaseConnection,
}

impl PostgresStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn collection(collection: &str) -> Select<DocumentEntity> {
        DocumentEntity::find().filter(document::Column::Collection.eq(collection))
    }
}

/// Escape LIKE metacharacters so the term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn apply_query(select: Select<DocumentEntity>, query: &DocumentQuery) -> Select<DocumentEntity> {
    let mut select = select;

    for filter in &query.filters {
        let mut probe = Map::new();
        probe.insert(filter.field.clone(), filter.value.clone());
        select = select.filter(Expr::cust_with_values(
            "body @> $1::jsonb",
            [json!(probe)],
        ));
    }

    if let Some(search) = &query.search {
        let pattern = like_pattern(&search.term);
        let any = search.fields.iter().fold(Condition::any(), |cond, field| {
            cond.add(Expr::cust_with_values(
                "(body ->> $1) ILIKE $2",
                [field.to_string(), pattern.clone()],
            ))
        });
        select = select.filter(any);
    }

    select
}

fn sort_expr(field: SortField) -> SimpleExpr {
    match field {
        SortField::CreatedAt => Expr::col(document::Column::CreatedAt).into(),
        SortField::Text(name) => Expr::cust_with_values("lower(body ->> $1)", [name]),
        SortField::Number(name) => {
            Expr::cust_with_values("(body ->> $1)::double precision", [name])
        }
    }
}

fn apply_order(select: Select<DocumentEntity>, query: &DocumentQuery) -> Select<DocumentEntity> {
    // Missing values first when ascending, last when descending
    let (order, nulls) = match query.sort.direction {
        Direction::Asc => (Order::Asc, NullOrdering::First),
        Direction::Desc => (Order::Desc, NullOrdering::Last),
    };
    select
        .order_by_with_nulls(sort_expr(query.sort.field), order, nulls)
        .order_by_asc(document::Column::Id)
}

#[async_trait]
impl DocumentStore for PostgresStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Postgres
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }

    async fn insert(&self, doc: Document) -> StoreResult<()> {
        let collection = doc.collection.clone();
        let key = doc.unique_key.clone().unwrap_or_default();
        let model = ActiveModel {
            id: Set(doc.id),
            collection: Set(doc.collection),
            unique_key: Set(doc.unique_key),
            body: Set(doc.body),
            created_at: Set(doc.created_at),
            updated_at: Set(doc.updated_at),
        };

        model.insert(&self.db).await.map_err(|e| match StoreError::from(e) {
            StoreError::DuplicateKey { .. } => StoreError::DuplicateKey { collection, key },
            other => other,
        })?;
        Ok(())
    }

    async fn get(&self, collection: &str, id: Uuid) -> StoreResult<Option<Document>> {
        let model = Self::collection(collection)
            .filter(document::Column::Id.eq(id))
            .one(&self.db)
            .await?;
        Ok(model.map(Document::from))
    }

    async fn find_unique(&self, collection: &str, key: &str) -> StoreResult<Option<Document>> {
        let model = Self::collection(collection)
            .filter(document::Column::UniqueKey.eq(key))
            .one(&self.db)
            .await?;
        Ok(model.map(Document::from))
    }

    async fn replace(&self, doc: Document) -> StoreResult<bool> {
        let result = DocumentEntity::update_many()
            .col_expr(document::Column::Body, Expr::value(doc.body))
            .col_expr(document::Column::UniqueKey, Expr::value(doc.unique_key.clone()))
            .col_expr(document::Column::UpdatedAt, Expr::value(doc.updated_at))
            .filter(document::Column::Collection.eq(doc.collection.as_str()))
            .filter(document::Column::Id.eq(doc.id))
            .exec(&self.db)
            .await
            .map_err(|e| match StoreError::from(e) {
                StoreError::DuplicateKey { .. } => StoreError::DuplicateKey {
                    collection: doc.collection.clone(),
                    key: doc.unique_key.clone().unwrap_or_default(),
                },
                other => other,
            })?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, collection: &str, id: Uuid) -> StoreResult<bool> {
        let result = DocumentEntity::delete_many()
            .filter(document::Column::Collection.eq(collection))
            .filter(document::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn find(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> StoreResult<(Vec<Document>, u64)> {
        let filtered = apply_query(Self::collection(collection), query);
        let total = filtered.clone().count(&self.db).await?;

        let mut select = apply_order(filtered, query);
        if let Some(window) = query.window {
            select = select.offset(window.offset).limit(window.limit);
        }
        tracing::debug!(collection, total, sort = ?query.sort, "document query");

        let models = select.all(&self.db).await?;
        Ok((models.into_iter().map(Document::from).collect(), total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("apple"), "%apple%");
        assert_eq!(like_pattern("100%_off"), "%100\\%\\_off%");
    }
}
