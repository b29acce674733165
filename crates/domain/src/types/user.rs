//! Quote issuer registry
//!
//! Minimal user records so every quote carries its issuer and rendered
//! documents can print a responsible name. There is no authentication here.

use serde::{Deserialize, Serialize};

/// Registered quote issuer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub created_at: i64,
}

/// Payload for registering a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}
