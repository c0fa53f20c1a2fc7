//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH, ROLE_ADMIN, ROLE_MANAGER, ROLE_USER};
use crate::error::DomainError;
use crate::password::Password;
use crate::resource::{Patch, Resource, UniqueKey};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Manager => ROLE_MANAGER,
            Role::User => ROLE_USER,
        }
    }

    /// Roles allowed to manage catalog content
    pub const STAFF: &'static [Role] = &[Role::Admin, Role::Manager];

    /// Roles allowed to delete resources and administer users
    pub const ADMIN: &'static [Role] = &[Role::Admin];

    /// Any authenticated user
    pub const ANY: &'static [Role] = &[Role::Admin, Role::Manager, Role::User];
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_MANAGER => Ok(Role::Manager),
            ROLE_USER => Ok(Role::User),
            other => Err(DomainError::validation(format!("Invalid role '{}'", other))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
///
/// The password hash is persisted with the document but never leaves the
/// service; API reads go through [`UserResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user with the default `user` role
    pub fn new(id: Uuid, name: String, email: &str, password: Password, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            email: normalize_email(email),
            password_hash: password.into_string(),
            roles: vec![Role::User],
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_any_role(&self, required: &[Role]) -> bool {
        self.roles.iter().any(|r| required.contains(r))
    }

    pub fn verify_password(&self, plain_text: &str) -> bool {
        Password::from_hash(self.password_hash.as_str()).verify(plain_text)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Resource for User {
    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "User";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email"];
    const NAME_FIELD: Option<&'static str> = Some("name");

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn unique_key(&self) -> Option<UniqueKey> {
        Some(UniqueKey::new("email", &self.email))
    }

    fn check(&self) -> crate::error::DomainResult<()> {
        if self.roles.is_empty() {
            return Err(DomainError::validation("User must have at least one role"));
        }
        Ok(())
    }
}

/// Registration input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewUser {
    #[serde(default)]
    #[validate(length(min = MIN_NAME_LENGTH, message = "Name is required"))]
    #[cfg_attr(feature = "openapi", schema(example = "Jane Doe"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    #[cfg_attr(feature = "openapi", schema(example = "jane@example.com"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Credentials {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Administrative user update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserChanges {
    #[validate(length(min = MIN_NAME_LENGTH, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "User must have at least one role"))]
    pub roles: Option<Vec<Role>>,
    pub is_active: Option<bool>,
}

impl Patch for UserChanges {
    type Target = User;

    fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = self.email {
            user.email = normalize_email(&email);
        }
        if let Some(roles) = self.roles {
            user.roles = roles;
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            roles: user.roles,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse::from(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            Uuid::new_v4(),
            " Jane ".into(),
            " Jane@Example.COM ",
            Password::new("secret-password").unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn test_new_user_defaults() {
        let user = user();
        assert_eq!(user.name, "Jane");
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.roles, vec![Role::User]);
        assert!(user.is_active);
        assert!(user.verify_password("secret-password"));
        assert!(!user.verify_password("wrong-password"));
    }

    #[test]
    fn test_role_membership() {
        let mut user = user();
        assert!(!user.has_any_role(Role::STAFF));
        assert!(user.has_any_role(Role::ANY));
        user.roles = vec![Role::Manager];
        assert!(user.has_any_role(Role::STAFF));
        assert!(!user.has_any_role(Role::ADMIN));
    }

    #[test]
    fn test_response_omits_password_hash() {
        let json = serde_json::to_value(UserResponse::from(user())).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("_id").is_some());
    }

    #[test]
    fn test_new_user_length_rules() {
        let input = NewUser {
            name: String::new(),
            email: "jane@example.com".into(),
            password: "short".into(),
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("password"));

        let input = NewUser {
            name: "J".into(),
            email: "jane@example.com".into(),
            password: "12345678".into(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("manager".parse::<Role>().unwrap(), Role::Manager);
        assert!("owner".parse::<Role>().is_err());
    }
}
