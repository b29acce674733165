//! SQLite implementations of the persistence ports

pub mod client_repository;
pub mod contract_repository;
pub mod invoice_repository;
pub mod lifecycle_store;
pub mod manager;
pub mod material_repository;
mod numbering;
pub mod order_repository;
pub mod pool;
pub mod quote_repository;
mod row;
pub mod user_repository;

pub use client_repository::*;
pub use contract_repository::*;
pub use invoice_repository::*;
pub use lifecycle_store::*;
pub use manager::*;
pub use material_repository::*;
pub use order_repository::*;
pub use pool::*;
pub use quote_repository::*;
pub use user_repository::*;
