//! Quote and supplier request handlers.
//!
//! Submissions are public; reading and status changes are staff-only.

use axum::{
    extract::State,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use common::{ApiResponse, AppResult, Created, ListResponse};
use domain::{NewQuote, Quote, QuoteKind, QuoteStatusChange};

use super::crud::ListParams;
use crate::extractors::{Admin, Authorized, JsonOrMultipart, Path, Query, Staff, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuoteFilter {
    /// `quote` or `supplier`
    pub kind: Option<QuoteKind>,
}

pub fn quote_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quotes).post(submit_quote))
        .route("/:id", get(get_quote).delete(delete_quote))
        .route("/:id/status", put(update_quote_status))
}

/// Mounted at `/api/supplier-requests`
pub fn supplier_request_routes() -> Router<AppState> {
    Router::new().route("/", post(submit_supplier_request))
}

#[utoipa::path(
    get,
    path = "/api/quotes",
    tag = "Quotes",
    security(("bearer_auth" = [])),
    params(ListParams, QuoteFilter),
    responses(
        (status = 200, description = "Page of quotes and supplier requests", body = [Quote]),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_quotes(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(filter): Query<QuoteFilter>,
) -> AppResult<ListResponse<Quote>> {
    let query = params
        .to_query()
        .filter_opt("kind", filter.kind.map(|k| k.as_str()));
    let page = state.catalog.quotes.list_quotes(&query).await?;
    let meta = page.meta();
    Ok(ListResponse::new(page.items, meta))
}

#[utoipa::path(
    get,
    path = "/api/quotes/{id}",
    tag = "Quotes",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Quote", body = Quote),
        (status = 404, description = "Quote not found")
    )
)]
pub async fn get_quote(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Quote>> {
    Ok(ApiResponse::success(state.catalog.quotes.get_quote(id).await?))
}

/// Request a quote
#[utoipa::path(
    post,
    path = "/api/quotes",
    tag = "Quotes",
    request_body = NewQuote,
    responses(
        (status = 201, description = "Quote request received", body = Quote),
        (status = 400, description = "Validation error")
    )
)]
pub async fn submit_quote(
    State(state): State<AppState>,
    body: JsonOrMultipart<NewQuote>,
) -> AppResult<Created<Quote>> {
    submit(&state, QuoteKind::Quote, body).await
}

/// Offer to supply
#[utoipa::path(
    post,
    path = "/api/supplier-requests",
    tag = "Quotes",
    request_body = NewQuote,
    responses(
        (status = 201, description = "Supplier request received", body = Quote),
        (status = 400, description = "Validation error")
    )
)]
pub async fn submit_supplier_request(
    State(state): State<AppState>,
    body: JsonOrMultipart<NewQuote>,
) -> AppResult<Created<Quote>> {
    submit(&state, QuoteKind::Supplier, body).await
}

async fn submit(
    state: &AppState,
    kind: QuoteKind,
    body: JsonOrMultipart<NewQuote>,
) -> AppResult<Created<Quote>> {
    let quotes = &state.catalog.quotes;
    let quote = body
        .commit(state.catalog.media.as_ref(), |input| quotes.submit(kind, input))
        .await?;
    Ok(Created(quote))
}

#[utoipa::path(
    put,
    path = "/api/quotes/{id}/status",
    tag = "Quotes",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Quote ID")),
    request_body = QuoteStatusChange,
    responses(
        (status = 200, description = "Quote updated", body = Quote),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Quote not found")
    )
)]
pub async fn update_quote_status(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(change): ValidatedJson<QuoteStatusChange>,
) -> AppResult<ApiResponse<Quote>> {
    let quote = state.catalog.quotes.change_status(id, change.status).await?;
    Ok(ApiResponse::success(quote))
}

#[utoipa::path(
    delete,
    path = "/api/quotes/{id}",
    tag = "Quotes",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Quote deleted", body = Quote),
        (status = 404, description = "Quote not found")
    )
)]
pub async fn delete_quote(
    _auth: Authorized<Admin>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Quote>> {
    let quote = state.catalog.quotes.delete_quote(id).await?;
    Ok(ApiResponse::with_message(quote, "Quote deleted successfully"))
}
