//! # Oficina API
//!
//! Application layer - composition root and command façade.
//!
//! This crate contains:
//! - The application context (dependency injection)
//! - Command functions (the operations a user interface invokes)
//! - Logging and health-check utilities
//!
//! ## Architecture
//! - Depends on `domain`, `core` and `infra`
//! - Wires up the hexagonal architecture
//! - Commands delegate to core services and log their outcome

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
