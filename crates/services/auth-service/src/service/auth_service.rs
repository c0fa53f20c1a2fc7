//! Authentication service - issues and checks bearer credentials.
//!
//! Tokens are HS256 JWTs. Every authenticated request re-reads the user,
//! so deleted or deactivated accounts lose access immediately and role
//! changes apply without re-login.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::client::UserDirectory;
use common::{AppError, AppResult, JwtConfig};
use domain::{
    Credentials, NewUser, Password, Role, User, UserResponse, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER,
};

/// Stands in for a stored hash when the email is unknown, so both paths
/// run one verification.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$3yUVbNM2EJu/7Vb5JkIv1A7tUp3JjY4nW8ymHxHqPqU";

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub roles: Vec<Role>,
    pub iat: i64,
    pub exp: i64,
}

/// Token response returned after successful login
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        self.roles.iter().any(|r| allowed.contains(r))
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            roles: user.roles.clone(),
        }
    }
}

/// Pure role membership check.
pub fn authorize(principal: &Principal, allowed: &[Role]) -> AppResult<()> {
    if principal.has_any_role(allowed) {
        Ok(())
    } else {
        tracing::debug!(user = %principal.id, "Role check failed");
        Err(AppError::Forbidden)
    }
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account with role `user`
    async fn register(&self, input: NewUser) -> AppResult<UserResponse>;

    /// Check credentials and issue a token
    async fn login(&self, credentials: Credentials) -> AppResult<TokenResponse>;

    /// Verify a token's signature and expiry
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve a bearer token to the current, active user
    async fn authenticate(&self, token: &str) -> AppResult<Principal>;

    /// Profile of an authenticated user
    async fn me(&self, principal: &Principal) -> AppResult<UserResponse>;
}

/// Concrete implementation of AuthService over a [`UserDirectory`].
pub struct Authenticator {
    users: Arc<dyn UserDirectory>,
    jwt: JwtConfig,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserDirectory>, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt.secret.as_bytes()
    }

    /// Generate JWT token for a user
    fn generate_token(&self, user: &User) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.jwt.expiration_hours);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            roles: user.roles.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret_bytes()),
        )
        .map_err(|e| AppError::internal(format!("token encoding: {}", e)))?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.jwt.expiration_hours * SECONDS_PER_HOUR,
        })
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, input: NewUser) -> AppResult<UserResponse> {
        input.validate()?;
        let user = self.users.create(input).await?;
        tracing::info!(user = %user.id, "User registered");
        Ok(UserResponse::from(user))
    }

    async fn login(&self, credentials: Credentials) -> AppResult<TokenResponse> {
        credentials.validate()?;
        let user = self.users.find_by_email(&credentials.email).await?;

        // Verify even for unknown emails to keep response timing uniform
        let hash = user
            .as_ref()
            .map_or(DUMMY_HASH, |u| u.password_hash.as_str());
        let password_valid = Password::from_hash(hash).verify(&credentials.password);

        match user {
            Some(user) if password_valid && user.is_active => {
                tracing::info!(user = %user.id, "User logged in");
                self.generate_token(&user)
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AppError::InvalidCredential
        })?;

        Ok(token_data.claims)
    }

    async fn authenticate(&self, token: &str) -> AppResult<Principal> {
        let claims = self.verify_token(token)?;
        match self.users.find_by_id(claims.sub).await? {
            Some(user) if user.is_active => Ok(Principal::from(&user)),
            _ => Err(AppError::InvalidCredential),
        }
    }

    async fn me(&self, principal: &Principal) -> AppResult<UserResponse> {
        self.users
            .find_by_id(principal.id)
            .await?
            .map(UserResponse::from)
            .ok_or(AppError::InvalidCredential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockUserDirectory;

    const SECRET: &str = "test-secret-that-is-at-least-32-characters";

    fn config() -> JwtConfig {
        JwtConfig {
            secret: SECRET.to_string(),
            expiration_hours: 1,
        }
    }

    fn stored_user(password: &str) -> User {
        User::new(
            Uuid::new_v4(),
            "Jane".into(),
            "jane@example.com",
            Password::new(password).unwrap(),
            Utc::now(),
        )
    }

    fn token_for(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_login_then_authenticate() {
        let user = stored_user("correct-horse");
        let by_email = user.clone();
        let by_id = user.clone();

        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_email()
            .returning(move |_| Ok(Some(by_email.clone())));
        directory
            .expect_find_by_id()
            .returning(move |_| Ok(Some(by_id.clone())));
        let auth = Authenticator::new(Arc::new(directory), config());

        let token = auth
            .login(Credentials {
                email: "jane@example.com".into(),
                password: "correct-horse".into(),
            })
            .await
            .unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);

        let principal = auth.authenticate(&token.access_token).await.unwrap();
        assert_eq!(principal.id, user.id);
        assert_eq!(principal.roles, vec![Role::User]);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = stored_user("correct-horse");
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        let auth = Authenticator::new(Arc::new(directory), config());

        let err = auth
            .login(Credentials {
                email: "jane@example.com".into(),
                password: "battery-staple".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut directory = MockUserDirectory::new();
        directory.expect_find_by_email().returning(|_| Ok(None));
        let auth = Authenticator::new(Arc::new(directory), config());

        let err = auth
            .login(Credentials {
                email: "ghost@example.com".into(),
                password: "whatever-123".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_expired_token_is_invalid() {
        let directory = MockUserDirectory::new();
        let auth = Authenticator::new(Arc::new(directory), config());
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "jane@example.com".into(),
            roles: vec![Role::Admin],
            iat: past.timestamp(),
            exp: (past + Duration::minutes(5)).timestamp(),
        };

        let err = auth
            .authenticate(&token_for(&claims, SECRET))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredential));
    }

    #[tokio::test]
    async fn test_foreign_signature_is_invalid() {
        let auth = Authenticator::new(Arc::new(MockUserDirectory::new()), config());
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "jane@example.com".into(),
            roles: vec![Role::Admin],
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let forged = token_for(&claims, "another-secret-that-is-32-characters-long");

        assert!(matches!(
            auth.authenticate(&forged).await,
            Err(AppError::InvalidCredential)
        ));
        assert!(matches!(
            auth.authenticate("not-a-jwt").await,
            Err(AppError::InvalidCredential)
        ));
    }

    fn live_claims(user: &User) -> Claims {
        Claims {
            sub: user.id,
            email: user.email.clone(),
            roles: user.roles.clone(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        }
    }

    #[tokio::test]
    async fn test_inactive_user_is_rejected() {
        let mut inactive = stored_user("correct-horse");
        inactive.is_active = false;
        let token = token_for(&live_claims(&inactive), SECRET);

        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_id()
            .returning(move |_| Ok(Some(inactive.clone())));
        let auth = Authenticator::new(Arc::new(directory), config());

        assert!(matches!(
            auth.authenticate(&token).await,
            Err(AppError::InvalidCredential)
        ));
    }

    #[tokio::test]
    async fn test_deleted_user_is_rejected() {
        let user = stored_user("correct-horse");
        let token = token_for(&live_claims(&user), SECRET);

        let mut directory = MockUserDirectory::new();
        directory.expect_find_by_id().returning(|_| Ok(None));
        let auth = Authenticator::new(Arc::new(directory), config());

        assert!(matches!(
            auth.authenticate(&token).await,
            Err(AppError::InvalidCredential)
        ));
    }

    #[test]
    fn test_authorize_by_role_membership() {
        let principal = Principal {
            id: Uuid::new_v4(),
            email: "m@example.com".into(),
            roles: vec![Role::Manager],
        };
        assert!(authorize(&principal, Role::STAFF).is_ok());
        assert!(matches!(
            authorize(&principal, Role::ADMIN),
            Err(AppError::Forbidden)
        ));
    }
}
