//! Document table entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::store::Document;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub collection: String,
    pub unique_key: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub body: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Document {
    fn from(model: Model) -> Self {
        Document {
            id: model.id,
            collection: model.collection,
            unique_key: model.unique_key,
            body: model.body,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
