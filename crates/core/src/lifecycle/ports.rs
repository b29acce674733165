//! Port interfaces for the order/contract/invoice pipeline
//!
//! The read-side repositories are plain per-entity queries. All state
//! transitions go through [`LifecycleStore`], whose implementations must
//! re-check every precondition inside the same transaction that applies the
//! effects; the service layer fast-fails on stale state first, but the store
//! check is the authoritative one.

use async_trait::async_trait;
use oficina_domain::{
    Contract, Invoice, InvoiceStatus, InvoiceSummary, Page, Quote, Result, ServiceOrder,
    ServiceOrderStatus, ServiceOrderSummary, ServiceReportFilter,
};
use rust_decimal::Decimal;

/// Listing filter for service orders
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Contains-search over order number, quote number and client name.
    pub search: Option<String>,
    pub status: Option<ServiceOrderStatus>,
}

/// Listing filter for invoices
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Contains-search over invoice number, order number and client name.
    pub search: Option<String>,
    pub status: Option<InvoiceStatus>,
}

/// Entities produced by accepting a quote
#[derive(Debug, Clone)]
pub struct AcceptedQuote {
    pub quote: Quote,
    pub order: ServiceOrder,
    pub contract: Contract,
}

/// Entities produced by completing an order
#[derive(Debug, Clone)]
pub struct CompletedOrder {
    pub order: ServiceOrder,
    pub invoice: Invoice,
}

/// Trait for service order retrieval and reporting queries
#[async_trait]
pub trait ServiceOrderRepository: Send + Sync {
    /// Get an order by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<ServiceOrder>>;

    /// Get the order opened from a quote
    async fn get_by_quote(&self, quote_id: i64) -> Result<Option<ServiceOrder>>;

    /// Page through orders with client context, newest first
    async fn list(&self, filter: &OrderFilter, page: u32) -> Result<Page<ServiceOrderSummary>>;

    /// Every order matching the report filter, newest first
    async fn report_rows(&self, filter: &ServiceReportFilter) -> Result<Vec<ServiceOrderSummary>>;

    /// Total number of orders
    async fn count(&self) -> Result<u64>;

    /// Number of orders in `status`
    async fn count_by_status(&self, status: ServiceOrderStatus) -> Result<u64>;

    /// Sum of quote totals over orders completed at or after `since`
    async fn revenue_since(&self, since: i64) -> Result<Decimal>;
}

/// Trait for contract retrieval
#[async_trait]
pub trait ContractRepository: Send + Sync {
    /// Get a contract by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Contract>>;

    /// Get the contract attached to an order
    async fn get_by_order(&self, order_id: i64) -> Result<Option<Contract>>;
}

/// Trait for invoice retrieval
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Get an invoice by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Invoice>>;

    /// Get the invoice issued for an order
    async fn get_by_order(&self, order_id: i64) -> Result<Option<Invoice>>;

    /// Page through invoices with order and client context, newest first
    async fn list(&self, filter: &InvoiceFilter, page: u32) -> Result<Page<InvoiceSummary>>;

    /// Total number of invoices
    async fn count(&self) -> Result<u64>;
}

/// Trait for transactional lifecycle transitions
///
/// Each method is one atomic unit of work: either every effect listed in its
/// documentation lands, or none do.
#[async_trait]
pub trait LifecycleStore: Send + Sync {
    /// pending -> accepted. Creates the numbered service order (status
    /// `created`, annotated with `order_note`) and its contract in the same
    /// transaction.
    async fn accept_quote(
        &self,
        quote_id: i64,
        at: i64,
        order_note: String,
        terms: String,
    ) -> Result<AcceptedQuote>;

    /// pending -> rejected.
    async fn reject_quote(&self, quote_id: i64) -> Result<Quote>;

    /// created -> in_progress. Stamps `started_at`.
    async fn start_order(&self, order_id: i64, at: i64) -> Result<ServiceOrder>;

    /// in_progress -> completed. Stamps `completed_at`, appends `note`
    /// verbatim to the order notes and issues the numbered invoice unless
    /// one already exists (idempotent).
    async fn complete_order(
        &self,
        order_id: i64,
        at: i64,
        note: Option<String>,
    ) -> Result<CompletedOrder>;

    /// created/in_progress -> canceled. Appends `note` verbatim and cancels
    /// the contract if one exists.
    async fn cancel_order(&self, order_id: i64, note: Option<String>) -> Result<ServiceOrder>;

    /// issued -> canceled.
    async fn cancel_invoice(&self, invoice_id: i64) -> Result<Invoice>;
}
