//! Brand handlers.

use axum::{
    extract::State,
    routing::get,
    Router,
};
use uuid::Uuid;

use common::{ApiResponse, AppResult, Created, ListResponse};
use domain::{Brand, BrandChanges, NewBrand};

use super::crud::{self, ListParams};
use crate::extractors::{Admin, Authorized, JsonOrMultipart, Path, Query, Staff};
use crate::state::AppState;

pub fn brand_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_brands).post(create_brand))
        .route("/:id", get(get_brand).put(update_brand).delete(delete_brand))
}

/// List brands
#[utoipa::path(
    get,
    path = "/api/brands",
    tag = "Brands",
    params(ListParams),
    responses((status = 200, description = "Page of brands", body = [Brand]))
)]
pub async fn list_brands(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<ListResponse<Brand>> {
    crud::list(&state.catalog.brands, params.to_query()).await
}

/// Get a brand
#[utoipa::path(
    get,
    path = "/api/brands/{id}",
    tag = "Brands",
    params(("id" = Uuid, Path, description = "Brand ID")),
    responses(
        (status = 200, description = "Brand", body = Brand),
        (status = 404, description = "Brand not found")
    )
)]
pub async fn get_brand(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Brand>> {
    crud::get(&state.catalog.brands, id).await
}

/// Create a brand
#[utoipa::path(
    post,
    path = "/api/brands",
    tag = "Brands",
    security(("bearer_auth" = [])),
    request_body = NewBrand,
    responses(
        (status = 201, description = "Brand created", body = Brand),
        (status = 400, description = "Missing field or name already exists"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_brand(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    body: JsonOrMultipart<NewBrand>,
) -> AppResult<Created<Brand>> {
    crud::create(&state.catalog.brands, state.catalog.media.as_ref(), body).await
}

/// Update a brand
#[utoipa::path(
    put,
    path = "/api/brands/{id}",
    tag = "Brands",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Brand ID")),
    request_body = BrandChanges,
    responses(
        (status = 200, description = "Brand updated", body = Brand),
        (status = 404, description = "Brand not found")
    )
)]
pub async fn update_brand(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonOrMultipart<BrandChanges>,
) -> AppResult<ApiResponse<Brand>> {
    crud::update(&state.catalog.brands, state.catalog.media.as_ref(), id, body).await
}

/// Delete a brand
#[utoipa::path(
    delete,
    path = "/api/brands/{id}",
    tag = "Brands",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Brand ID")),
    responses(
        (status = 200, description = "Brand deleted", body = Brand),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Brand not found")
    )
)]
pub async fn delete_brand(
    _auth: Authorized<Admin>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Brand>> {
    crud::delete(&state.catalog.brands, id).await
}
