//! # Oficina Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite persistence (repositories and the transactional lifecycle store)
//! - Configuration loading (environment and config files)
//! - Document rendering (PDF and spreadsheet backends)
//!
//! ## Architecture
//! - Implements traits defined in `oficina-core`
//! - Depends on `oficina-domain` and `oficina-core`
//! - Contains all "impure" code (I/O, rendering)

pub mod config;
pub mod database;
pub mod errors;
pub mod render;

// Re-export commonly used items
pub use config::*;
pub use database::*;
pub use errors::*;
pub use render::*;
