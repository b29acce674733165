//! Document aggregate assembly and rendering dispatch

pub mod ports;
pub mod service;

pub use service::DocumentService;
