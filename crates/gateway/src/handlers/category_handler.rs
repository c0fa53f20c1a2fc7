//! Category handlers.

use axum::{
    extract::State,
    routing::get,
    Router,
};
use uuid::Uuid;

use common::{ApiResponse, AppResult, Created, ListResponse};
use domain::{Category, CategoryChanges, NewCategory};

use super::crud::{self, ListParams};
use crate::extractors::{Admin, Authorized, JsonOrMultipart, Path, Query, Staff};
use crate::state::AppState;

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/slug/:slug", get(get_category_by_slug))
        .route("/:id", get(get_category).put(update_category).delete(delete_category))
}

/// List categories
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Categories",
    params(ListParams),
    responses((status = 200, description = "Page of categories", body = [Category]))
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<ListResponse<Category>> {
    crud::list(&state.catalog.categories, params.to_query()).await
}

/// Get a category
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = Category),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Category>> {
    crud::get(&state.catalog.categories, id).await
}

/// Get a category by slug
#[utoipa::path(
    get,
    path = "/api/categories/slug/{slug}",
    tag = "Categories",
    params(("slug" = String, Path, description = "URL slug")),
    responses(
        (status = 200, description = "Category", body = Category),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<ApiResponse<Category>> {
    crud::by_slug(&state.catalog.categories, &slug).await
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    request_body = NewCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Missing field or name already exists"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_category(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    body: JsonOrMultipart<NewCategory>,
) -> AppResult<Created<Category>> {
    crud::create(&state.catalog.categories, state.catalog.media.as_ref(), body).await
}

/// Update a category
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CategoryChanges,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 404, description = "Category not found")
    )
)]
pub async fn update_category(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonOrMultipart<CategoryChanges>,
) -> AppResult<ApiResponse<Category>> {
    crud::update(&state.catalog.categories, state.catalog.media.as_ref(), id, body).await
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = Category),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    _auth: Authorized<Admin>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Category>> {
    crud::delete(&state.catalog.categories, id).await
}
