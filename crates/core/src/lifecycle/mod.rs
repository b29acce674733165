//! Quote/order/contract/invoice lifecycle orchestration

pub mod ports;
pub mod service;

pub use service::LifecycleService;
