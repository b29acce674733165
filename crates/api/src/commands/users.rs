//! Issuer registry commands

use oficina_domain::{NewUser, Result, User};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_logged;

/// Register a user. Email must be unique.
pub async fn register_user(context: &AppContext, input: NewUser) -> Result<User> {
    execute_logged("users::register_user", context.users.register_user(input)).await
}

/// Get a user by ID.
pub async fn get_user(context: &AppContext, id: i64) -> Result<User> {
    execute_logged("users::get_user", context.users.get_user(id)).await
}

/// List all users, active and inactive.
pub async fn list_users(context: &AppContext) -> Result<Vec<User>> {
    execute_logged("users::list_users", context.users.list_users()).await
}

/// Activate or deactivate a user.
pub async fn set_user_active(context: &AppContext, id: i64, active: bool) -> Result<User> {
    execute_logged("users::set_user_active", context.users.set_user_active(id, active)).await
}
