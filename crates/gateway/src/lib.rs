//! Catalog API gateway.
//!
//! Serves the REST surface, the typed-operation endpoint, uploaded media and
//! the OpenAPI document over an in-process [`catalog_service::Catalog`].

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use catalog_service::{connect_store, Catalog, LocalMediaStore};
use domain::{NewUser, Role, UserResponse};
use tracing::info;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Connect the document store and serve HTTP until the process stops.
pub async fn run_server(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    common::expose_error_details(!config.environment.is_production());

    let store = connect_store(config.store_backend, &config.database).await?;

    tokio::fs::create_dir_all(&config.upload.dir).await?;
    let media = Arc::new(LocalMediaStore::new(&config.upload.dir));

    let addr: SocketAddr = config.server_addr().parse()?;
    info!(
        environment = config.environment.as_str(),
        store = config.store_backend.as_str(),
        "Gateway listening on {}",
        addr
    );

    let state = AppState::new(store, media, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Register an administrator directly against the store.
///
/// Self-registration only ever grants the `user` role, so the first admin
/// has to be created out of band.
pub async fn create_admin(
    config: &GatewayConfig,
    input: NewUser,
) -> Result<UserResponse, Box<dyn std::error::Error>> {
    let store = connect_store(config.store_backend, &config.database).await?;
    let media = Arc::new(LocalMediaStore::new(&config.upload.dir));
    let catalog = Catalog::new(store, media);

    let user = catalog.users.register(input, vec![Role::Admin]).await?;
    info!(user_id = %user.id, "Administrator created");

    Ok(UserResponse::from(user))
}
