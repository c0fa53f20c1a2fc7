//! Order handlers.

use axum::{
    extract::State,
    routing::{get, put},
    Router,
};
use uuid::Uuid;

use common::{ApiResponse, AppResult, Created, ListResponse};
use domain::{NewOrder, Order, OrderStatusChange};

use super::crud::ListParams;
use crate::extractors::{Admin, Authorized, Member, Path, Query, Staff, ValidatedJson};
use crate::state::AppState;

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/mine", get(my_orders))
        .route("/:id", get(get_order).delete(delete_order))
        .route("/:id/status", put(update_order_status))
}

/// List all orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "Page of orders", body = [Order]),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_orders(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<ListResponse<Order>> {
    let page = state.catalog.orders.list_orders(&params.to_query()).await?;
    let meta = page.meta();
    Ok(ListResponse::new(page.items, meta))
}

/// Orders placed by the caller
#[utoipa::path(
    get,
    path = "/api/orders/mine",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "Page of the caller's orders", body = [Order]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn my_orders(
    caller: Authorized<Member>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<ListResponse<Order>> {
    let page = state
        .catalog
        .orders
        .list_user_orders(caller.principal.id, &params.to_query())
        .await?;
    let meta = page.meta();
    Ok(ListResponse::new(page.items, meta))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order", body = Order),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Order>> {
    Ok(ApiResponse::success(state.catalog.orders.get_order(id).await?))
}

/// Place an order
///
/// Line prices and names are looked up server-side and snapshotted.
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = NewOrder,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Empty order or unavailable product"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn create_order(
    caller: Authorized<Member>,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NewOrder>,
) -> AppResult<Created<Order>> {
    let order = state
        .catalog
        .orders
        .place_order(caller.principal.id, input)
        .await?;
    Ok(Created(order))
}

/// Move an order through its lifecycle
#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = OrderStatusChange,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order_status(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(change): ValidatedJson<OrderStatusChange>,
) -> AppResult<ApiResponse<Order>> {
    let order = state.catalog.orders.change_status(id, change.status).await?;
    Ok(ApiResponse::success(order))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted", body = Order),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn delete_order(
    _auth: Authorized<Admin>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Order>> {
    let order = state.catalog.orders.delete_order(id).await?;
    Ok(ApiResponse::with_message(order, "Order deleted successfully"))
}
