//! Product handlers, including the embedded flavor and size variants.

use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use catalog_service::ListQuery;
use common::{ApiResponse, AppResult, Created, ListResponse};
use domain::{
    NewProduct, NewProductFlavor, NewProductSize, Product, ProductChanges, ProductFlavorChanges,
    ProductSizeChanges,
};

use super::crud::{self, ListParams};
use crate::extractors::{Admin, Authorized, JsonOrMultipart, Path, Query, Staff};
use crate::state::AppState;

/// Reference filters only products carry.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductRefs {
    /// Category ID
    pub category: Option<Uuid>,
    /// Brand ID
    pub brand: Option<Uuid>,
}

impl ProductRefs {
    pub(super) fn apply(&self, query: ListQuery) -> ListQuery {
        query
            .filter_opt("category", self.category.map(|id| id.to_string()))
            .filter_opt("brand", self.brand.map(|id| id.to_string()))
    }
}

/// Storefront search response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchResponse {
    pub success: bool,
    pub products: Vec<Product>,
    pub total_products: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/query", get(search_products))
        .route("/category/:id", get(products_by_category))
        .route("/brand/:id", get(products_by_brand))
        .route("/slug/:slug", get(get_product_by_slug))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/flavors", post(add_product_flavor))
        .route(
            "/:id/flavors/:variant_id",
            put(update_product_flavor).delete(delete_product_flavor),
        )
        .route("/:id/sizes", post(add_product_size))
        .route(
            "/:id/sizes/:variant_id",
            put(update_product_size).delete(delete_product_size),
        )
}

/// List products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ListParams, ProductRefs),
    responses((status = 200, description = "Page of products", body = [Product]))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(refs): Query<ProductRefs>,
) -> AppResult<ListResponse<Product>> {
    crud::list(&state.catalog.products, refs.apply(params.to_query())).await
}

/// Search products
///
/// Same filters as the list endpoint, in the storefront response shape.
#[utoipa::path(
    get,
    path = "/api/products/query",
    tag = "Products",
    params(ListParams, ProductRefs),
    responses((status = 200, description = "Matching products", body = ProductSearchResponse))
)]
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(refs): Query<ProductRefs>,
) -> AppResult<Json<ProductSearchResponse>> {
    let query = refs.apply(params.to_query());
    let page = state.catalog.products.list(&query).await?;
    let meta = page.meta();

    Ok(Json(ProductSearchResponse {
        success: true,
        products: page.items,
        total_products: meta.total,
        current_page: meta.current_page,
        total_pages: meta.total_pages,
    }))
}

/// Products in a category
#[utoipa::path(
    get,
    path = "/api/products/category/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Category ID"), ListParams),
    responses((status = 200, description = "Page of products", body = [Product]))
)]
pub async fn products_by_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> AppResult<ListResponse<Product>> {
    let query = params.to_query().filter("category", id.to_string());
    crud::list(&state.catalog.products, query).await
}

/// Products of a brand
#[utoipa::path(
    get,
    path = "/api/products/brand/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Brand ID"), ListParams),
    responses((status = 200, description = "Page of products", body = [Product]))
)]
pub async fn products_by_brand(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> AppResult<ListResponse<Product>> {
    let query = params.to_query().filter("brand", id.to_string());
    crud::list(&state.catalog.products, query).await
}

#[utoipa::path(
    get,
    path = "/api/products/slug/{slug}",
    tag = "Products",
    params(("slug" = String, Path, description = "URL slug")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<ApiResponse<Product>> {
    crud::by_slug(&state.catalog.products, &slug).await
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Product>> {
    crud::get(&state.catalog.products, id).await
}

/// Create a product
///
/// Accepts JSON or multipart form data; `images` file parts are stored
/// and referenced by their public path.
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_product(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    body: JsonOrMultipart<NewProduct>,
) -> AppResult<Created<Product>> {
    crud::create(&state.catalog.products, state.catalog.media.as_ref(), body).await
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = ProductChanges,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonOrMultipart<ProductChanges>,
) -> AppResult<ApiResponse<Product>> {
    crud::update(&state.catalog.products, state.catalog.media.as_ref(), id, body).await
}

/// Delete a product with its variants and images
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = Product),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    _auth: Authorized<Admin>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Product>> {
    crud::delete(&state.catalog.products, id).await
}

// =============================================================================
// Variants
// =============================================================================

/// Add a flavor variant
#[utoipa::path(
    post,
    path = "/api/products/{id}/flavors",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = NewProductFlavor,
    responses(
        (status = 201, description = "Parent product with the new flavor", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn add_product_flavor(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonOrMultipart<NewProductFlavor>,
) -> AppResult<Created<Product>> {
    let variants = &state.catalog.product_flavors;
    let product = body
        .commit(state.catalog.media.as_ref(), |draft| variants.add(id, draft))
        .await?;
    Ok(Created(product))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}/flavors/{variant_id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("variant_id" = Uuid, Path, description = "Flavor variant ID")
    ),
    request_body = ProductFlavorChanges,
    responses(
        (status = 200, description = "Parent product", body = Product),
        (status = 404, description = "Product or flavor not found")
    )
)]
pub async fn update_product_flavor(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path((id, variant_id)): Path<(Uuid, Uuid)>,
    body: JsonOrMultipart<ProductFlavorChanges>,
) -> AppResult<ApiResponse<Product>> {
    let variants = &state.catalog.product_flavors;
    let product = body
        .commit(state.catalog.media.as_ref(), |changes| {
            variants.update(id, variant_id, changes)
        })
        .await?;
    Ok(ApiResponse::success(product))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}/flavors/{variant_id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("variant_id" = Uuid, Path, description = "Flavor variant ID")
    ),
    responses(
        (status = 200, description = "Parent product", body = Product),
        (status = 404, description = "Product or flavor not found")
    )
)]
pub async fn delete_product_flavor(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path((id, variant_id)): Path<(Uuid, Uuid)>,
) -> AppResult<ApiResponse<Product>> {
    let product = state.catalog.product_flavors.remove(id, variant_id).await?;
    Ok(ApiResponse::success(product))
}

/// Add a size variant
#[utoipa::path(
    post,
    path = "/api/products/{id}/sizes",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = NewProductSize,
    responses(
        (status = 201, description = "Parent product with the new size", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn add_product_size(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonOrMultipart<NewProductSize>,
) -> AppResult<Created<Product>> {
    let variants = &state.catalog.product_sizes;
    let product = body
        .commit(state.catalog.media.as_ref(), |draft| variants.add(id, draft))
        .await?;
    Ok(Created(product))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}/sizes/{variant_id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("variant_id" = Uuid, Path, description = "Size variant ID")
    ),
    request_body = ProductSizeChanges,
    responses(
        (status = 200, description = "Parent product", body = Product),
        (status = 404, description = "Product or size not found")
    )
)]
pub async fn update_product_size(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path((id, variant_id)): Path<(Uuid, Uuid)>,
    body: JsonOrMultipart<ProductSizeChanges>,
) -> AppResult<ApiResponse<Product>> {
    let variants = &state.catalog.product_sizes;
    let product = body
        .commit(state.catalog.media.as_ref(), |changes| {
            variants.update(id, variant_id, changes)
        })
        .await?;
    Ok(ApiResponse::success(product))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}/sizes/{variant_id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("variant_id" = Uuid, Path, description = "Size variant ID")
    ),
    responses(
        (status = 200, description = "Parent product", body = Product),
        (status = 404, description = "Product or size not found")
    )
)]
pub async fn delete_product_size(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path((id, variant_id)): Path<(Uuid, Uuid)>,
) -> AppResult<ApiResponse<Product>> {
    let product = state.catalog.product_sizes.remove(id, variant_id).await?;
    Ok(ApiResponse::success(product))
}
