//! Typed-operation endpoint.
//!
//! `POST /api/ops` takes `{"operation": "<name>", "variables": {...}}` and
//! answers `{"data": {"<name>": result}}`, or `{"data": null, "errors": [..]}`
//! with the HTTP status the REST surface would use for the same failure.
//! Each operation deserializes into a typed [`Operation`] variant, so
//! variables are checked the same way request bodies are.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use auth_service_lib::Principal;
use catalog_service::{Catalog, Page};
use common::{AppError, AppResult, PageMeta};
use domain::{
    BrandChanges, CategoryChanges, FlavorChanges, FlavorSizeChanges, NewBrand, NewCategory,
    NewFlavor, NewFlavorSize, NewOrder, NewProduct, NewProductFlavor, NewProductSize, NewSize,
    OrderStatus, ProductChanges, ProductFlavorChanges, ProductSizeChanges, Role, SizeChanges,
};

use super::crud::ListParams;
use super::product_handler::ProductRefs;
use crate::extractors::{RequestContext, ValidatedJson};
use crate::state::AppState;

pub fn ops_routes() -> Router<AppState> {
    Router::new().route("/", post(execute_operation))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OperationRequest {
    /// Operation name, e.g. `products` or `createSize`
    #[validate(length(min = 1, message = "Operation name is required"))]
    #[schema(example = "products")]
    pub operation: String,
    #[serde(default)]
    pub variables: Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OperationResponse {
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<OperationError>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OperationError {
    pub message: String,
    pub code: String,
}

/// Run a named query or mutation
#[utoipa::path(
    post,
    path = "/api/ops",
    tag = "Operations",
    security((), ("bearer_auth" = [])),
    request_body = OperationRequest,
    responses(
        (status = 200, description = "Operation result under its name", body = OperationResponse),
        (status = 400, description = "Unknown operation or invalid variables", body = OperationResponse),
        (status = 401, description = "Unauthorized", body = OperationResponse),
        (status = 403, description = "Forbidden", body = OperationResponse),
        (status = 404, description = "Not found", body = OperationResponse)
    )
)]
pub async fn execute_operation(
    State(state): State<AppState>,
    context: RequestContext,
    ValidatedJson(request): ValidatedJson<OperationRequest>,
) -> Response {
    let name = request.operation.clone();

    match run(&state, &context, request).await {
        Ok(result) => {
            let mut data = Map::new();
            data.insert(name, result);
            Json(OperationResponse {
                data: Some(Value::Object(data)),
                errors: Vec::new(),
            })
            .into_response()
        }
        Err(e) => {
            let status: StatusCode = e.status();
            let body = OperationResponse {
                data: None,
                errors: vec![OperationError {
                    message: e.user_message(),
                    code: e.code().to_string(),
                }],
            };
            (status, Json(body)).into_response()
        }
    }
}

async fn run(state: &AppState, context: &RequestContext, request: OperationRequest) -> AppResult<Value> {
    tracing::debug!(operation = %request.operation, "Executing operation");

    let variables = match request.variables {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    let operation: Operation = serde_json::from_value(json!({
        "operation": request.operation,
        "variables": variables,
    }))
    .map_err(|e| AppError::validation(format!("Invalid operation: {}", e)))?;

    let caller = match operation.required_roles() {
        Some(roles) => Some(context.require(roles)?),
        None => context.principal(),
    };
    operation.execute(&state.catalog, caller).await
}

// =============================================================================
// Variables
// =============================================================================

#[derive(Deserialize)]
struct IdVars {
    id: Uuid,
}

#[derive(Deserialize)]
struct InputVars<T> {
    input: T,
}

#[derive(Deserialize)]
struct UpdateVars<T> {
    id: Uuid,
    input: T,
}

#[derive(Deserialize)]
struct ProductListVars {
    #[serde(flatten)]
    params: ListParams,
    #[serde(flatten)]
    refs: ProductRefs,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryListVars {
    category_id: Uuid,
    #[serde(flatten)]
    params: ListParams,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductVariantInput<T> {
    product_id: Uuid,
    input: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductVariantUpdate<T> {
    product_id: Uuid,
    variant_id: Uuid,
    input: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductVariantRef {
    product_id: Uuid,
    variant_id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlavorSizeInput {
    flavor_id: Uuid,
    input: NewFlavorSize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlavorSizeUpdate {
    flavor_id: Uuid,
    size_id: Uuid,
    input: FlavorSizeChanges,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlavorSizeRef {
    flavor_id: Uuid,
    size_id: Uuid,
}

#[derive(Deserialize)]
struct StatusVars {
    id: Uuid,
    status: OrderStatus,
}

/// List results: `{items, total, currentPage, totalPages, limit}`
#[derive(Serialize)]
struct PageResult<T> {
    items: Vec<T>,
    #[serde(flatten)]
    meta: PageMeta,
}

// =============================================================================
// Operations
// =============================================================================

#[derive(Deserialize)]
#[serde(tag = "operation", content = "variables", rename_all = "camelCase")]
enum Operation {
    Products(ProductListVars),
    Product(IdVars),
    ProductsByCategory(CategoryListVars),
    CreateProduct(InputVars<NewProduct>),
    UpdateProduct(UpdateVars<ProductChanges>),
    DeleteProduct(IdVars),
    AddProductFlavor(ProductVariantInput<NewProductFlavor>),
    UpdateProductFlavor(ProductVariantUpdate<ProductFlavorChanges>),
    DeleteProductFlavor(ProductVariantRef),
    AddProductSize(ProductVariantInput<NewProductSize>),
    UpdateProductSize(ProductVariantUpdate<ProductSizeChanges>),
    DeleteProductSize(ProductVariantRef),

    Flavors(ListParams),
    Flavor(IdVars),
    CreateFlavor(InputVars<NewFlavor>),
    UpdateFlavor(UpdateVars<FlavorChanges>),
    DeleteFlavor(IdVars),
    // Sizes embedded in a flavor
    AddSize(FlavorSizeInput),
    UpdateSize(FlavorSizeUpdate),
    DeleteSize(FlavorSizeRef),

    Sizes(ListParams),
    Size(IdVars),
    CreateSize(InputVars<NewSize>),
    UpdateCatalogSize(UpdateVars<SizeChanges>),
    DeleteCatalogSize(IdVars),

    Brands(ListParams),
    Brand(IdVars),
    CreateBrand(InputVars<NewBrand>),
    UpdateBrand(UpdateVars<BrandChanges>),
    DeleteBrand(IdVars),

    Categories(ListParams),
    Category(IdVars),
    CreateCategory(InputVars<NewCategory>),
    UpdateCategory(UpdateVars<CategoryChanges>),
    DeleteCategory(IdVars),

    Orders(ListParams),
    Order(IdVars),
    CreateOrder(InputVars<NewOrder>),
    UpdateOrderStatus(StatusVars),
}

impl Operation {
    /// Roles the caller needs; `None` for public reads.
    fn required_roles(&self) -> Option<&'static [Role]> {
        match self {
            Self::Products(_)
            | Self::Product(_)
            | Self::ProductsByCategory(_)
            | Self::Flavors(_)
            | Self::Flavor(_)
            | Self::Sizes(_)
            | Self::Size(_)
            | Self::Brands(_)
            | Self::Brand(_)
            | Self::Categories(_)
            | Self::Category(_) => None,
            Self::DeleteProduct(_)
            | Self::DeleteFlavor(_)
            | Self::DeleteCatalogSize(_)
            | Self::DeleteBrand(_)
            | Self::DeleteCategory(_) => Some(Role::ADMIN),
            Self::CreateOrder(_) => Some(Role::ANY),
            _ => Some(Role::STAFF),
        }
    }

    async fn execute(self, catalog: &Catalog, caller: Option<&Principal>) -> AppResult<Value> {
        match self {
            Self::Products(vars) => {
                let query = vars.refs.apply(vars.params.to_query());
                page(catalog.products.list(&query).await?)
            }
            Self::Product(vars) => json(catalog.products.get(vars.id).await?),
            Self::ProductsByCategory(vars) => {
                let query = vars
                    .params
                    .to_query()
                    .filter("category", vars.category_id.to_string());
                page(catalog.products.list(&query).await?)
            }
            Self::CreateProduct(vars) => json(catalog.products.create(vars.input).await?),
            Self::UpdateProduct(vars) => json(catalog.products.update(vars.id, vars.input).await?),
            Self::DeleteProduct(vars) => json(catalog.products.delete(vars.id).await?),
            Self::AddProductFlavor(vars) => {
                json(catalog.product_flavors.add(vars.product_id, vars.input).await?)
            }
            Self::UpdateProductFlavor(vars) => json(
                catalog
                    .product_flavors
                    .update(vars.product_id, vars.variant_id, vars.input)
                    .await?,
            ),
            Self::DeleteProductFlavor(vars) => json(
                catalog
                    .product_flavors
                    .remove(vars.product_id, vars.variant_id)
                    .await?,
            ),
            Self::AddProductSize(vars) => {
                json(catalog.product_sizes.add(vars.product_id, vars.input).await?)
            }
            Self::UpdateProductSize(vars) => json(
                catalog
                    .product_sizes
                    .update(vars.product_id, vars.variant_id, vars.input)
                    .await?,
            ),
            Self::DeleteProductSize(vars) => json(
                catalog
                    .product_sizes
                    .remove(vars.product_id, vars.variant_id)
                    .await?,
            ),

            Self::Flavors(params) => page(catalog.flavors.list(&params.to_query()).await?),
            Self::Flavor(vars) => json(catalog.flavors.get(vars.id).await?),
            Self::CreateFlavor(vars) => json(catalog.flavors.create(vars.input).await?),
            Self::UpdateFlavor(vars) => json(catalog.flavors.update(vars.id, vars.input).await?),
            Self::DeleteFlavor(vars) => json(catalog.flavors.delete(vars.id).await?),
            Self::AddSize(vars) => json(catalog.flavor_sizes.add(vars.flavor_id, vars.input).await?),
            Self::UpdateSize(vars) => json(
                catalog
                    .flavor_sizes
                    .update(vars.flavor_id, vars.size_id, vars.input)
                    .await?,
            ),
            Self::DeleteSize(vars) => {
                json(catalog.flavor_sizes.remove(vars.flavor_id, vars.size_id).await?)
            }

            Self::Sizes(params) => page(catalog.sizes.list(&params.to_query()).await?),
            Self::Size(vars) => json(catalog.sizes.get(vars.id).await?),
            Self::CreateSize(vars) => json(catalog.sizes.create(vars.input).await?),
            Self::UpdateCatalogSize(vars) => json(catalog.sizes.update(vars.id, vars.input).await?),
            Self::DeleteCatalogSize(vars) => json(catalog.sizes.delete(vars.id).await?),

            Self::Brands(params) => page(catalog.brands.list(&params.to_query()).await?),
            Self::Brand(vars) => json(catalog.brands.get(vars.id).await?),
            Self::CreateBrand(vars) => json(catalog.brands.create(vars.input).await?),
            Self::UpdateBrand(vars) => json(catalog.brands.update(vars.id, vars.input).await?),
            Self::DeleteBrand(vars) => json(catalog.brands.delete(vars.id).await?),

            Self::Categories(params) => page(catalog.categories.list(&params.to_query()).await?),
            Self::Category(vars) => json(catalog.categories.get(vars.id).await?),
            Self::CreateCategory(vars) => json(catalog.categories.create(vars.input).await?),
            Self::UpdateCategory(vars) => {
                json(catalog.categories.update(vars.id, vars.input).await?)
            }
            Self::DeleteCategory(vars) => json(catalog.categories.delete(vars.id).await?),

            Self::Orders(params) => page(catalog.orders.list_orders(&params.to_query()).await?),
            Self::Order(vars) => json(catalog.orders.get_order(vars.id).await?),
            Self::CreateOrder(vars) => {
                let caller = caller.ok_or(AppError::MissingCredential)?;
                json(catalog.orders.place_order(caller.id, vars.input).await?)
            }
            Self::UpdateOrderStatus(vars) => {
                json(catalog.orders.change_status(vars.id, vars.status).await?)
            }
        }
    }
}

fn json<T: Serialize>(value: T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|e| AppError::internal(format!("serializing result: {}", e)))
}

fn page<T: Serialize>(page: Page<T>) -> AppResult<Value> {
    let meta = page.meta();
    json(PageResult {
        items: page.items,
        meta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(operation: &str, variables: Value) -> Result<Operation, serde_json::Error> {
        serde_json::from_value(json!({"operation": operation, "variables": variables}))
    }

    #[test]
    fn test_names_map_to_variants() {
        assert!(matches!(parse("products", json!({})), Ok(Operation::Products(_))));
        assert!(matches!(
            parse("updateCatalogSize", json!({"id": Uuid::new_v4(), "input": {"name": "XL"}})),
            Ok(Operation::UpdateCatalogSize(_))
        ));
        assert!(matches!(
            parse("deleteSize", json!({"flavorId": Uuid::new_v4(), "sizeId": Uuid::new_v4()})),
            Ok(Operation::DeleteSize(_))
        ));
        assert!(parse("dropDatabase", json!({})).is_err());
    }

    #[test]
    fn test_list_variables_keep_numbers() {
        let op = parse("products", json!({"search": "apple", "limit": 3, "page": 2})).unwrap();
        let Operation::Products(vars) = op else {
            panic!("expected products");
        };
        assert_eq!(vars.params.window(), common::Window::new(3, 3));
    }

    #[test]
    fn test_role_requirements() {
        let id = json!({"id": Uuid::new_v4()});
        assert_eq!(parse("brand", id.clone()).unwrap().required_roles(), None);
        assert_eq!(
            parse("deleteBrand", id.clone()).unwrap().required_roles(),
            Some(Role::ADMIN)
        );
        assert_eq!(
            parse("updateOrderStatus", json!({"id": Uuid::new_v4(), "status": "shipped"}))
                .unwrap()
                .required_roles(),
            Some(Role::STAFF)
        );
    }
}
