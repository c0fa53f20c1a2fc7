//! Flavor handlers and the sizes embedded in each flavor.

use axum::{
    extract::State,
    routing::{get, post, put},
    Router,
};
use uuid::Uuid;

use common::{ApiResponse, AppResult, Created, ListResponse};
use domain::{Flavor, FlavorChanges, FlavorSizeChanges, NewFlavor, NewFlavorSize};

use super::crud::{self, ListParams};
use crate::extractors::{Admin, Authorized, JsonOrMultipart, Path, Query, Staff};
use crate::state::AppState;

pub fn flavor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_flavors).post(create_flavor))
        .route("/:id", get(get_flavor).put(update_flavor).delete(delete_flavor))
        .route("/:id/sizes", post(add_flavor_size))
        .route(
            "/:id/sizes/:size_id",
            put(update_flavor_size).delete(delete_flavor_size),
        )
}

/// List flavors
#[utoipa::path(
    get,
    path = "/api/flavors",
    tag = "Flavors",
    params(ListParams),
    responses((status = 200, description = "Page of flavors", body = [Flavor]))
)]
pub async fn list_flavors(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<ListResponse<Flavor>> {
    crud::list(&state.catalog.flavors, params.to_query()).await
}

/// Get a flavor
#[utoipa::path(
    get,
    path = "/api/flavors/{id}",
    tag = "Flavors",
    params(("id" = Uuid, Path, description = "Flavor ID")),
    responses(
        (status = 200, description = "Flavor", body = Flavor),
        (status = 404, description = "Flavor not found")
    )
)]
pub async fn get_flavor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Flavor>> {
    crud::get(&state.catalog.flavors, id).await
}

/// Create a flavor
#[utoipa::path(
    post,
    path = "/api/flavors",
    tag = "Flavors",
    security(("bearer_auth" = [])),
    request_body = NewFlavor,
    responses(
        (status = 201, description = "Flavor created", body = Flavor),
        (status = 400, description = "Missing field or name already exists"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_flavor(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    body: JsonOrMultipart<NewFlavor>,
) -> AppResult<Created<Flavor>> {
    crud::create(&state.catalog.flavors, state.catalog.media.as_ref(), body).await
}

/// Update a flavor
#[utoipa::path(
    put,
    path = "/api/flavors/{id}",
    tag = "Flavors",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Flavor ID")),
    request_body = FlavorChanges,
    responses(
        (status = 200, description = "Flavor updated", body = Flavor),
        (status = 404, description = "Flavor not found")
    )
)]
pub async fn update_flavor(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonOrMultipart<FlavorChanges>,
) -> AppResult<ApiResponse<Flavor>> {
    crud::update(&state.catalog.flavors, state.catalog.media.as_ref(), id, body).await
}

/// Delete a flavor with its sizes and images
#[utoipa::path(
    delete,
    path = "/api/flavors/{id}",
    tag = "Flavors",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Flavor ID")),
    responses(
        (status = 200, description = "Flavor deleted", body = Flavor),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Flavor not found")
    )
)]
pub async fn delete_flavor(
    _auth: Authorized<Admin>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Flavor>> {
    crud::delete(&state.catalog.flavors, id).await
}

/// Add a size to a flavor
#[utoipa::path(
    post,
    path = "/api/flavors/{id}/sizes",
    tag = "Flavors",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Flavor ID")),
    request_body = NewFlavorSize,
    responses(
        (status = 201, description = "Parent flavor with the new size", body = Flavor),
        (status = 404, description = "Flavor not found")
    )
)]
pub async fn add_flavor_size(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonOrMultipart<NewFlavorSize>,
) -> AppResult<Created<Flavor>> {
    let sizes = &state.catalog.flavor_sizes;
    let flavor = body
        .commit(state.catalog.media.as_ref(), |draft| sizes.add(id, draft))
        .await?;
    Ok(Created(flavor))
}

/// Update one of a flavor's sizes
#[utoipa::path(
    put,
    path = "/api/flavors/{id}/sizes/{size_id}",
    tag = "Flavors",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Flavor ID"),
        ("size_id" = Uuid, Path, description = "Embedded size ID")
    ),
    request_body = FlavorSizeChanges,
    responses(
        (status = 200, description = "Parent flavor", body = Flavor),
        (status = 404, description = "Flavor or size not found")
    )
)]
pub async fn update_flavor_size(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path((id, size_id)): Path<(Uuid, Uuid)>,
    body: JsonOrMultipart<FlavorSizeChanges>,
) -> AppResult<ApiResponse<Flavor>> {
    let sizes = &state.catalog.flavor_sizes;
    let flavor = body
        .commit(state.catalog.media.as_ref(), |changes| {
            sizes.update(id, size_id, changes)
        })
        .await?;
    Ok(ApiResponse::success(flavor))
}

#[utoipa::path(
    delete,
    path = "/api/flavors/{id}/sizes/{size_id}",
    tag = "Flavors",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Flavor ID"),
        ("size_id" = Uuid, Path, description = "Embedded size ID")
    ),
    responses(
        (status = 200, description = "Parent flavor", body = Flavor),
        (status = 404, description = "Flavor or size not found")
    )
)]
pub async fn delete_flavor_size(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path((id, size_id)): Path<(Uuid, Uuid)>,
) -> AppResult<ApiResponse<Flavor>> {
    let flavor = state.catalog.flavor_sizes.remove(id, size_id).await?;
    Ok(ApiResponse::success(flavor))
}
