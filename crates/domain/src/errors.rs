//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Oficina
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum OficinaError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Record in use: {0}")]
    Referenced(String),

    #[error("Rendering error: {0}")]
    Rendering(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Oficina operations
pub type Result<T> = std::result::Result<T, OficinaError>;
