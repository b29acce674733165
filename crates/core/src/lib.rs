//! # Oficina Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits)
//! - Use cases and services
//!
//! ## Architecture Principles
//! - Only depends on `oficina-domain`
//! - No database or rendering-backend code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod catalog;
pub mod documents;
pub mod lifecycle;
pub mod quoting;
pub mod reporting;
pub mod user;

// Re-export specific items to avoid ambiguity
pub use catalog::ports::{ClientRepository, MaterialRepository};
pub use catalog::CatalogService;
pub use documents::ports::DocumentRenderer;
pub use documents::DocumentService;
pub use lifecycle::ports::{
    AcceptedQuote, CompletedOrder, ContractRepository, InvoiceFilter, InvoiceRepository,
    LifecycleStore, OrderFilter, ServiceOrderRepository,
};
pub use lifecycle::LifecycleService;
pub use quoting::ports::{NewQuoteRecord, QuoteFilter, QuoteRepository, QuoteRevision, QuoteUpdate};
pub use quoting::QuoteService;
pub use reporting::ReportService;
pub use user::ports::UserRepository;
pub use user::UserService;
