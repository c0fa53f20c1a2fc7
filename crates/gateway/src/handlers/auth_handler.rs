//! Authentication handlers.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};

use auth_service_lib::TokenResponse;
use common::{ApiResponse, AppResult, Created};
use domain::{Credentials, NewUser, UserResponse};

use crate::extractors::{Authorized, Member, ValidatedJson};
use crate::state::AppState;

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

/// Register a new customer account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = NewUser,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Invalid input or email already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NewUser>,
) -> AppResult<Created<UserResponse>> {
    let user = state.auth.register(input).await?;
    Ok(Created(user))
}

/// Login and get access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = Credentials,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let token = state.auth.login(credentials).await?;
    Ok(ApiResponse::success(token))
}

/// Get the current user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(
    caller: Authorized<Member>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.auth.me(&caller.principal).await?;
    Ok(ApiResponse::success(user))
}
