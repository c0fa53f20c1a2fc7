//! Route configuration.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::GatewayConfig;
use crate::handlers::{
    auth_routes, blog_routes, brand_routes, category_routes, flavor_routes,
    health_handler::health_check, health_routes, offering_routes, ops_routes, order_routes,
    product_routes, quote_routes, size_routes, supplier_request_routes, user_routes,
};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Uploads a single multipart request may carry at the per-file ceiling
const MAX_FILES_PER_REQUEST: usize = 8;

/// Room for the non-file parts of a request
const BODY_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/", get(health_check))
        .nest("/health", health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/flavors", flavor_routes())
        .nest("/api/sizes", size_routes())
        .nest("/api/brands", brand_routes())
        .nest("/api/categories", category_routes())
        .nest("/api/services", offering_routes())
        .nest("/api/blogs", blog_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/quotes", quote_routes())
        .nest("/api/supplier-requests", supplier_request_routes())
        .nest("/api/users", user_routes())
        .nest("/api/ops", ops_routes())
        .nest_service("/uploads", ServeDir::new(&config.upload.dir))
        .layer(DefaultBodyLimit::max(body_limit(&config)))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn body_limit(config: &GatewayConfig) -> usize {
    config
        .upload
        .max_bytes
        .saturating_mul(MAX_FILES_PER_REQUEST)
        .saturating_add(BODY_OVERHEAD_BYTES)
}

/// An empty origin list allows any origin.
fn cors_layer(config: &GatewayConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    if config.cors_allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
