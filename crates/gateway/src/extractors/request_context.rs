//! Per-request credential state.
//!
//! [`RequestContext`] records what the `Authorization` header amounted to
//! without failing the request, so public routes can still see who is
//! calling. [`Authorized`] turns a role policy into an extractor that
//! rejects before any later extractor (body parsing, uploads) runs.

use std::marker::PhantomData;

use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};

use auth_service_lib::{authorize, Principal};
use common::{AppError, AppResult};
use domain::{Role, BEARER_TOKEN_PREFIX};

use crate::state::AppState;

/// What the caller presented.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialState {
    /// No `Authorization` header
    Absent,
    /// Malformed, expired, forged, or for a user that is gone or inactive
    Invalid,
    Valid(Principal),
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub credential: CredentialState,
}

impl RequestContext {
    pub fn principal(&self) -> Option<&Principal> {
        match &self.credential {
            CredentialState::Valid(principal) => Some(principal),
            _ => None,
        }
    }

    /// The caller, provided they hold one of `roles`.
    pub fn require(&self, roles: &[Role]) -> AppResult<&Principal> {
        match &self.credential {
            CredentialState::Absent => Err(AppError::MissingCredential),
            CredentialState::Invalid => Err(AppError::InvalidCredential),
            CredentialState::Valid(principal) => {
                authorize(principal, roles)?;
                Ok(principal)
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Self {
                credential: CredentialState::Absent,
            });
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix(BEARER_TOKEN_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty());

        let credential = match token {
            None => CredentialState::Invalid,
            Some(token) => match state.auth.authenticate(token).await {
                Ok(principal) => CredentialState::Valid(principal),
                Err(AppError::InvalidCredential) => CredentialState::Invalid,
                // Store outages are not the caller's fault
                Err(e) => return Err(e),
            },
        };

        Ok(Self { credential })
    }
}

/// A set of roles allowed through an [`Authorized`] extractor.
pub trait Policy: Send + Sync + 'static {
    const ROLES: &'static [Role];
}

/// `admin` or `manager`
pub enum Staff {}

impl Policy for Staff {
    const ROLES: &'static [Role] = Role::STAFF;
}

/// `admin` only
pub enum Admin {}

impl Policy for Admin {
    const ROLES: &'static [Role] = Role::ADMIN;
}

/// Any signed-in user
pub enum Member {}

impl Policy for Member {
    const ROLES: &'static [Role] = Role::ANY;
}

/// Extracts the caller only if they satisfy policy `P`.
pub struct Authorized<P: Policy> {
    pub principal: Principal,
    _policy: PhantomData<P>,
}

#[async_trait]
impl<P: Policy> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let context = RequestContext::from_request_parts(parts, state).await?;
        let principal = context.require(P::ROLES)?.clone();
        Ok(Self {
            principal,
            _policy: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn context(credential: CredentialState) -> RequestContext {
        RequestContext { credential }
    }

    fn manager() -> Principal {
        Principal {
            id: Uuid::new_v4(),
            email: "m@example.com".into(),
            roles: vec![Role::Manager],
        }
    }

    #[test]
    fn test_absent_is_missing_credential() {
        let err = context(CredentialState::Absent)
            .require(Role::ANY)
            .unwrap_err();
        assert!(matches!(err, AppError::MissingCredential));
    }

    #[test]
    fn test_invalid_is_invalid_credential() {
        let err = context(CredentialState::Invalid)
            .require(Role::ANY)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredential));
    }

    #[test]
    fn test_role_membership() {
        let ctx = context(CredentialState::Valid(manager()));
        assert!(ctx.require(Role::STAFF).is_ok());
        assert!(matches!(
            ctx.require(Role::ADMIN),
            Err(AppError::Forbidden)
        ));
        assert!(ctx.principal().is_some());
    }
}
