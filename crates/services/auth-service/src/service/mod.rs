//! Authentication service business logic.

mod auth_service;

pub use auth_service::{authorize, AuthService, Authenticator, Claims, Principal, TokenResponse};
