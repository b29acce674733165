//! Service reports and the dashboard snapshot

pub mod service;

pub use service::ReportService;
