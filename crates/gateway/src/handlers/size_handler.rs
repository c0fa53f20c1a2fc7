//! Size catalog handlers.

use axum::{
    extract::State,
    routing::get,
    Router,
};
use uuid::Uuid;

use common::{ApiResponse, AppResult, Created, ListResponse};
use domain::{NewSize, Size, SizeChanges};

use super::crud::{self, ListParams};
use crate::extractors::{Admin, Authorized, JsonOrMultipart, Path, Query, Staff};
use crate::state::AppState;

pub fn size_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sizes).post(create_size))
        .route("/:id", get(get_size).put(update_size).delete(delete_size))
}

/// List sizes
#[utoipa::path(
    get,
    path = "/api/sizes",
    tag = "Sizes",
    params(ListParams),
    responses((status = 200, description = "Page of sizes", body = [Size]))
)]
pub async fn list_sizes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<ListResponse<Size>> {
    crud::list(&state.catalog.sizes, params.to_query()).await
}

/// Get a size
#[utoipa::path(
    get,
    path = "/api/sizes/{id}",
    tag = "Sizes",
    params(("id" = Uuid, Path, description = "Size ID")),
    responses(
        (status = 200, description = "Size", body = Size),
        (status = 404, description = "Size not found")
    )
)]
pub async fn get_size(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Size>> {
    crud::get(&state.catalog.sizes, id).await
}

/// Create a size
#[utoipa::path(
    post,
    path = "/api/sizes",
    tag = "Sizes",
    security(("bearer_auth" = [])),
    request_body = NewSize,
    responses(
        (status = 201, description = "Size created", body = Size),
        (status = 400, description = "Missing field or name already exists"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_size(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    body: JsonOrMultipart<NewSize>,
) -> AppResult<Created<Size>> {
    crud::create(&state.catalog.sizes, state.catalog.media.as_ref(), body).await
}

/// Update a size
#[utoipa::path(
    put,
    path = "/api/sizes/{id}",
    tag = "Sizes",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Size ID")),
    request_body = SizeChanges,
    responses(
        (status = 200, description = "Size updated", body = Size),
        (status = 404, description = "Size not found")
    )
)]
pub async fn update_size(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonOrMultipart<SizeChanges>,
) -> AppResult<ApiResponse<Size>> {
    crud::update(&state.catalog.sizes, state.catalog.media.as_ref(), id, body).await
}

/// Delete a size
#[utoipa::path(
    delete,
    path = "/api/sizes/{id}",
    tag = "Sizes",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Size ID")),
    responses(
        (status = 200, description = "Size deleted", body = Size),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Size not found")
    )
)]
pub async fn delete_size(
    _auth: Authorized<Admin>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Size>> {
    crud::delete(&state.catalog.sizes, id).await
}
