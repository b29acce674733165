//! User service - issuer registry rules

use std::sync::Arc;

use chrono::Utc;
use oficina_domain::{NewUser, OficinaError, Result, User};

use super::ports::UserRepository;

/// User service
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create a new user service
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a user. Email must be unique.
    pub async fn register_user(&self, mut user: NewUser) -> Result<User> {
        user.name = user.name.trim().to_string();
        user.email = user.email.trim().to_lowercase();
        if user.name.is_empty() {
            return Err(OficinaError::Validation("user name is required".to_string()));
        }
        if user.email.is_empty() || !user.email.contains('@') {
            return Err(OficinaError::Validation("a valid email is required".to_string()));
        }
        if self.users.get_by_email(&user.email).await?.is_some() {
            return Err(OficinaError::Conflict(format!(
                "email {} is already registered",
                user.email
            )));
        }
        self.users.create(user, Utc::now().timestamp()).await
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: i64) -> Result<User> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or_else(|| OficinaError::NotFound(format!("user {id} not found")))
    }

    /// All users ordered by name.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.users.list().await
    }

    /// Activate or deactivate a user.
    pub async fn set_user_active(&self, id: i64, active: bool) -> Result<User> {
        self.get_user(id).await?;
        self.users.set_active(id, active).await
    }
}
