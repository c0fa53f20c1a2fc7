//! Catalog Service Library
//!
//! Document persistence, typed repositories, embedded variants and the
//! services behind every catalog resource. The gateway drives it
//! in-process through [`Catalog`].

pub mod catalog;
pub mod error;
pub mod infra;
pub mod media;
pub mod query;
pub mod repository;
pub mod service;
pub mod store;
pub mod variants;

use std::sync::Arc;

use common::{DatabaseConfig, StoreBackend};
use sea_orm::DbErr;
use tracing::info;

pub use catalog::Catalog;
pub use error::{StoreError, StoreResult};
pub use media::{LocalMediaStore, MediaStore};
pub use query::{ListQuery, Page, SortKey};
pub use repository::Repository;
pub use store::{DocumentStore, MemoryStore, PostgresStore};
pub use variants::VariantManager;

use crate::infra::Database;

/// Open the configured document store.
///
/// The Postgres backend connects with bounded retries and applies pending
/// migrations; the memory backend starts empty.
pub async fn connect_store(
    backend: StoreBackend,
    config: &DatabaseConfig,
) -> Result<Arc<dyn DocumentStore>, DbErr> {
    match backend {
        StoreBackend::Postgres => {
            let db = Database::connect(config).await?;
            Ok(Arc::new(PostgresStore::new(db.get_connection())))
        }
        StoreBackend::Memory => {
            info!("Using in-memory document store");
            Ok(MemoryStore::new_shared())
        }
    }
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(config: &DatabaseConfig, action: MigrateAction) -> Result<(), DbErr> {
    let db = Database::connect_without_migrations(config).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
