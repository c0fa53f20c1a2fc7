//! User lookups needed by authentication.

use std::sync::Arc;

use async_trait::async_trait;
use catalog_service::service::UserService;
use uuid::Uuid;

use common::AppResult;
use domain::{NewUser, Role, User};

/// Trait for user operations needed by the authenticator.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find user by id, password hash included
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email, password hash included
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new account with the default `user` role
    async fn create(&self, input: NewUser) -> AppResult<User>;
}

/// [`UserDirectory`] over the catalog's users collection.
pub struct CatalogUsers {
    users: Arc<dyn UserService>,
}

impl CatalogUsers {
    pub fn new(users: Arc<dyn UserService>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for CatalogUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.users.find_user(id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.users.find_by_email(email).await
    }

    async fn create(&self, input: NewUser) -> AppResult<User> {
        self.users.register(input, vec![Role::User]).await
    }
}
