//! User service - Handles user-related business logic.
//!
//! Reads handed to API callers go out as [`UserResponse`]; the raw
//! [`User`] (with its password hash) is only returned to credential checks.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult};
use domain::{normalize_email, NewUser, Password, Role, User, UserChanges, UserResponse};

use crate::query::{ListQuery, Page};
use crate::repository::Repository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn list_users(&self, query: &ListQuery) -> AppResult<Page<UserResponse>>;

    async fn get_user(&self, id: Uuid) -> AppResult<UserResponse>;

    /// Full user record, password hash included
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Full user record by (case-insensitive) email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create an account with the given roles. Fails when the email is taken.
    async fn register(&self, input: NewUser, roles: Vec<Role>) -> AppResult<User>;

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<UserResponse>;

    async fn delete_user(&self, id: Uuid) -> AppResult<UserResponse>;
}

/// Concrete implementation of UserService using the users collection.
pub struct UserManager {
    users: Repository<User>,
}

impl UserManager {
    pub fn new(users: Repository<User>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn list_users(&self, query: &ListQuery) -> AppResult<Page<UserResponse>> {
        Ok(self.users.list(query).await?.map(UserResponse::from))
    }

    async fn get_user(&self, id: Uuid) -> AppResult<UserResponse> {
        self.users.get(id).await.map(UserResponse::from)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        self.users.find(id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.users.find_one("email", normalize_email(email)).await
    }

    async fn register(&self, input: NewUser, roles: Vec<Role>) -> AppResult<User> {
        input.validate()?;

        // Reject a taken email before hashing
        if self.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("User email"));
        }

        let password = Password::new(&input.password)?;
        let mut user = User::new(Uuid::new_v4(), input.name, &input.email, password, Utc::now());
        if !roles.is_empty() {
            user.roles = roles;
        }
        self.users.insert(user).await
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<UserResponse> {
        self.users.update(id, changes).await.map(UserResponse::from)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<UserResponse> {
        self.users.delete(id).await.map(UserResponse::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::media::MockMediaStore;
    use crate::store::MemoryStore;

    fn service() -> UserManager {
        UserManager::new(Repository::new(
            MemoryStore::new_shared(),
            Arc::new(MockMediaStore::new()),
        ))
    }

    fn jane() -> NewUser {
        NewUser {
            name: "Jane".into(),
            email: "Jane@Example.com".into(),
            password: "correct-horse".into(),
        }
    }

    #[tokio::test]
    async fn test_register_defaults_to_user_role() {
        let service = service();
        let user = service.register(jane(), vec![]).await.unwrap();

        assert_eq!(user.roles, vec![Role::User]);
        assert_eq!(user.email, "jane@example.com");
        assert!(user.verify_password("correct-horse"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = service();
        service.register(jane(), vec![]).await.unwrap();

        let err = service
            .register(
                NewUser {
                    email: "JANE@example.com".into(),
                    ..jane()
                },
                vec![],
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User email already exists");
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let service = service();
        let err = service
            .register(
                NewUser {
                    password: "short".into(),
                    ..jane()
                },
                vec![],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_find_by_email_is_case_insensitive() {
        let service = service();
        let user = service.register(jane(), vec![Role::Admin]).await.unwrap();

        let found = service.find_by_email(" JANE@EXAMPLE.COM ").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_update_roles() {
        let service = service();
        let user = service.register(jane(), vec![]).await.unwrap();

        let updated = service
            .update_user(
                user.id,
                UserChanges {
                    roles: Some(vec![Role::Manager]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.roles, vec![Role::Manager]);
        assert_eq!(updated.name, "Jane");

        let err = service
            .update_user(
                user.id,
                UserChanges {
                    roles: Some(vec![]),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
