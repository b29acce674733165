//! Quote issuance and editing

pub mod ports;
pub mod service;

pub use service::QuoteService;
