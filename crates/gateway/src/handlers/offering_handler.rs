//! Service offering handlers, mounted at `/api/services`.

use axum::{
    extract::State,
    routing::get,
    Router,
};
use uuid::Uuid;

use common::{ApiResponse, AppResult, Created, ListResponse};
use domain::{NewServiceOffering, ServiceOffering, ServiceOfferingChanges};

use super::crud::{self, ListParams};
use crate::extractors::{Admin, Authorized, JsonOrMultipart, Path, Query, Staff};
use crate::state::AppState;

pub fn offering_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_offerings).post(create_offering))
        .route("/:id", get(get_offering).put(update_offering).delete(delete_offering))
}

/// List services
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Services",
    params(ListParams),
    responses((status = 200, description = "Page of services", body = [ServiceOffering]))
)]
pub async fn list_offerings(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<ListResponse<ServiceOffering>> {
    crud::list(&state.catalog.offerings, params.to_query()).await
}

/// Get a service
#[utoipa::path(
    get,
    path = "/api/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service", body = ServiceOffering),
        (status = 404, description = "Service not found")
    )
)]
pub async fn get_offering(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<ServiceOffering>> {
    crud::get(&state.catalog.offerings, id).await
}

/// Create a service
#[utoipa::path(
    post,
    path = "/api/services",
    tag = "Services",
    security(("bearer_auth" = [])),
    request_body = NewServiceOffering,
    responses(
        (status = 201, description = "Service created", body = ServiceOffering),
        (status = 400, description = "Missing field or name already exists"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_offering(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    body: JsonOrMultipart<NewServiceOffering>,
) -> AppResult<Created<ServiceOffering>> {
    crud::create(&state.catalog.offerings, state.catalog.media.as_ref(), body).await
}

/// Update a service
#[utoipa::path(
    put,
    path = "/api/services/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = ServiceOfferingChanges,
    responses(
        (status = 200, description = "Service updated", body = ServiceOffering),
        (status = 404, description = "Service not found")
    )
)]
pub async fn update_offering(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonOrMultipart<ServiceOfferingChanges>,
) -> AppResult<ApiResponse<ServiceOffering>> {
    crud::update(&state.catalog.offerings, state.catalog.media.as_ref(), id, body).await
}

/// Delete a service
#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service deleted", body = ServiceOffering),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn delete_offering(
    _auth: Authorized<Admin>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<ServiceOffering>> {
    crud::delete(&state.catalog.offerings, id).await
}
