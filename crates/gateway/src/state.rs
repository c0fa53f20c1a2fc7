//! Application state for dependency injection.

use std::sync::Arc;
use std::time::Instant;

use auth_service_lib::{AuthService, Authenticator, CatalogUsers};
use catalog_service::{Catalog, DocumentStore, MediaStore};

use crate::config::GatewayConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub auth: Arc<dyn AuthService>,
    pub config: Arc<GatewayConfig>,
    pub started_at: Instant,
}

impl AppState {
    /// Wire the catalog and authenticator over the given stores.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        media: Arc<dyn MediaStore>,
        config: GatewayConfig,
    ) -> Self {
        let catalog = Catalog::new(store, media);
        let users = Arc::new(CatalogUsers::new(catalog.users.clone()));
        let auth = Arc::new(Authenticator::new(users, config.jwt.clone()));

        Self {
            catalog,
            auth,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}
