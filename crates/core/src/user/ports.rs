//! Port interfaces for the quote issuer registry
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations for user records.

use async_trait::async_trait;
use oficina_domain::{NewUser, Result, User};

/// Trait for user persistence and retrieval
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return the stored row
    async fn create(&self, user: NewUser, created_at: i64) -> Result<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get a user by email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// All users ordered by name
    async fn list(&self) -> Result<Vec<User>>;

    /// Flip the active flag
    async fn set_active(&self, id: i64, active: bool) -> Result<User>;
}
