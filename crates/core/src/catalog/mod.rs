//! Client and material catalog

pub mod ports;
pub mod service;

pub use service::CatalogService;
