//! # Oficina Domain
//!
//! Business domain types and models for Oficina.
//!
//! This crate contains:
//! - Domain data types (Client, Material, Quote, ServiceOrder, ...)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Document numbering and tax-id helpers
//!
//! ## Architecture
//! - No dependencies on other Oficina crates
//! - External dependencies limited to serde, chrono, rust_decimal, thiserror
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod numbering;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use numbering::DocumentSeries;
pub use types::*;
