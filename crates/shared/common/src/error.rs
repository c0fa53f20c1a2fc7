//! Unified error handling.
//!
//! Every failure raised by the services is converted into [`AppError`],
//! and [`AppError::status`] is the one place where errors become HTTP
//! status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use once_cell::sync::OnceCell;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

static EXPOSE_DETAILS: OnceCell<bool> = OnceCell::new();

/// Include internal error details in responses. Set once at startup,
/// only in development.
pub fn expose_error_details(enabled: bool) {
    let _ = EXPOSE_DETAILS.set(enabled);
}

fn details_exposed() -> bool {
    EXPOSE_DETAILS.get().copied().unwrap_or(false)
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    MissingCredential,

    #[error("Invalid or expired token")]
    InvalidCredential,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied")]
    Forbidden,

    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[cfg(feature = "jwt")]
    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Service unavailable")]
    ServiceUnavailable(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingCredential => "UNAUTHORIZED",
            AppError::InvalidCredential => "INVALID_TOKEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "DUPLICATE",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "INVALID_TOKEN",
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingCredential
            | AppError::InvalidCredential
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            // Uniqueness violations are reported as validation failures
            AppError::Conflict(_) | AppError::Validation(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            #[cfg(feature = "database")]
            AppError::Database(e) if is_connection_error(e) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details outside development)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Conflict(_) | AppError::NotFound(_) => self.to_string(),

            #[cfg(feature = "database")]
            AppError::Database(e) => {
                if is_connection_error(e) {
                    tracing::error!(error = ?e, "Store connection failure");
                } else {
                    tracing::error!(error = ?e, "Database error");
                }
                hidden("A database error occurred", e)
            }
            #[cfg(feature = "jwt")]
            AppError::Jwt(e) => {
                tracing::debug!(error = ?e, "Token rejected");
                "Invalid or expired token".to_string()
            }
            AppError::ServiceUnavailable(reason) => {
                tracing::error!(reason = %reason, "Service unavailable");
                hidden("Service temporarily unavailable", reason)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                hidden("An internal error occurred", msg)
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

fn hidden(generic: &str, detail: impl std::fmt::Display) -> String {
    if details_exposed() {
        format!("{}: {}", generic, detail)
    } else {
        generic.to_string()
    }
}

#[cfg(feature = "database")]
fn is_connection_error(err: &sea_orm::DbErr) -> bool {
    matches!(
        err,
        sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_)
    )
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            success: false,
            error: self.user_message(),
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::Password(msg) => AppError::Validation(msg),
            DomainError::NotFound(label) => AppError::NotFound(label),
            DomainError::Conflict(key) => AppError::Conflict(key),
            err @ DomainError::InvalidTransition { .. } => AppError::Validation(err.to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(
            first_message(&errors).unwrap_or_else(|| "Validation failed".to_string()),
        )
    }
}

/// First validation message, walking fields in name order so the
/// reported error is stable.
fn first_message(errors: &ValidationErrors) -> Option<String> {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by_key(|(field, _)| **field);

    fields.into_iter().find_map(|(field, kind)| match kind {
        ValidationErrorsKind::Field(list) => list.first().map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid", field))
        }),
        ValidationErrorsKind::Struct(inner) => first_message(inner),
        ValidationErrorsKind::List(items) => items.values().find_map(|inner| first_message(inner)),
    })
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, label: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, label: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(label.to_string()))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(label: impl Into<String>) -> Self {
        AppError::NotFound(label.into())
    }

    pub fn conflict(key: impl Into<String>) -> Self {
        AppError::Conflict(key.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn service_unavailable(reason: impl Into<String>) -> Self {
        AppError::ServiceUnavailable(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Input {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(length(min = 1, message = "Description is required"))]
        description: String,
    }

    #[test]
    fn test_status_table() {
        assert_eq!(AppError::not_found("Flavor").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("Size name").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::MissingCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::service_unavailable("store").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(AppError::not_found("Flavor").user_message(), "Flavor not found");
        assert_eq!(
            AppError::conflict("Size name").user_message(),
            "Size name already exists"
        );
        assert_eq!(
            AppError::internal("connection string leaked").user_message(),
            "An internal error occurred"
        );
    }

    #[test]
    fn test_domain_conversion() {
        let err: AppError = DomainError::not_found("Size").into();
        assert!(matches!(err, AppError::NotFound(ref l) if l == "Size"));

        let err: AppError = DomainError::invalid_transition("delivered", "placed").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_first_validation_message_is_stable() {
        let input = Input {
            name: String::new(),
            description: String::new(),
        };
        let err: AppError = input.validate().unwrap_err().into();
        assert_eq!(err.user_message(), "Description is required");
    }
}
