//! Lifecycle service - status transitions and their cascades
//!
//! Accepting a quote opens the service order and its contract; completing an
//! order issues the invoice; canceling an order cancels its contract. The
//! service checks transition legality against the freshly read entity for a
//! precise error, then hands the whole cascade to the transactional store,
//! which re-checks under the write lock.

use std::sync::Arc;

use chrono::Utc;
use oficina_domain::constants::{CONTRACT_TERMS_TEMPLATE, ORDER_CREATED_NOTE_TEMPLATE};
use oficina_domain::{
    Contract, Invoice, InvoiceSummary, OficinaError, Page, Quote, Result, ServiceOrder,
    ServiceOrderSummary,
};
use tracing::info;

use super::ports::{
    AcceptedQuote, CompletedOrder, ContractRepository, InvoiceFilter, InvoiceRepository,
    LifecycleStore, OrderFilter, ServiceOrderRepository,
};
use crate::quoting::ports::QuoteRepository;

/// Lifecycle service
pub struct LifecycleService {
    quotes: Arc<dyn QuoteRepository>,
    orders: Arc<dyn ServiceOrderRepository>,
    contracts: Arc<dyn ContractRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    store: Arc<dyn LifecycleStore>,
    company_name: String,
}

impl LifecycleService {
    /// Create a new lifecycle service. `company_name` is substituted into
    /// generated contract terms.
    pub fn new(
        quotes: Arc<dyn QuoteRepository>,
        orders: Arc<dyn ServiceOrderRepository>,
        contracts: Arc<dyn ContractRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        store: Arc<dyn LifecycleStore>,
        company_name: String,
    ) -> Self {
        Self { quotes, orders, contracts, invoices, store, company_name }
    }

    /// Accept a pending quote, opening its service order and contract.
    pub async fn accept_quote(&self, quote_id: i64) -> Result<AcceptedQuote> {
        let quote = self.require_quote(quote_id).await?;
        if !quote.status.is_decidable() {
            return Err(OficinaError::InvalidTransition(format!(
                "quote {} is {} and can no longer be accepted",
                quote.number, quote.status
            )));
        }

        let order_note = ORDER_CREATED_NOTE_TEMPLATE.replace("{number}", &quote.number);
        let terms = CONTRACT_TERMS_TEMPLATE.replace("{company}", &self.company_name);
        let accepted =
            self.store.accept_quote(quote_id, Utc::now().timestamp(), order_note, terms).await?;
        info!(
            quote = %accepted.quote.number,
            order = %accepted.order.number,
            contract = %accepted.contract.number,
            "quote accepted"
        );
        Ok(accepted)
    }

    /// Reject a pending quote.
    pub async fn reject_quote(&self, quote_id: i64) -> Result<Quote> {
        let quote = self.require_quote(quote_id).await?;
        if !quote.status.is_decidable() {
            return Err(OficinaError::InvalidTransition(format!(
                "quote {} is {} and can no longer be rejected",
                quote.number, quote.status
            )));
        }
        let quote = self.store.reject_quote(quote_id).await?;
        info!(quote = %quote.number, "quote rejected");
        Ok(quote)
    }

    /// Start work on a created order.
    pub async fn start_order(&self, order_id: i64) -> Result<ServiceOrder> {
        let order = self.require_order(order_id).await?;
        if !order.status.can_start() {
            return Err(OficinaError::InvalidTransition(format!(
                "order {} is {} and cannot be started",
                order.number, order.status
            )));
        }
        let order = self.store.start_order(order_id, Utc::now().timestamp()).await?;
        info!(order = %order.number, "order started");
        Ok(order)
    }

    /// Complete an in-progress order, issuing its invoice.
    ///
    /// Invoice creation is idempotent in the store: if a crash or retry
    /// already left an invoice behind, that one is returned.
    pub async fn complete_order(
        &self,
        order_id: i64,
        note: Option<String>,
    ) -> Result<CompletedOrder> {
        let order = self.require_order(order_id).await?;
        if !order.status.can_complete() {
            return Err(OficinaError::InvalidTransition(format!(
                "order {} is {} and cannot be completed",
                order.number, order.status
            )));
        }
        let note = annotation("Conclusão", note);
        let completed = self.store.complete_order(order_id, Utc::now().timestamp(), note).await?;
        info!(
            order = %completed.order.number,
            invoice = %completed.invoice.number,
            total = %completed.invoice.total_value,
            "order completed, invoice issued"
        );
        Ok(completed)
    }

    /// Cancel a created or in-progress order along with its contract.
    pub async fn cancel_order(&self, order_id: i64, note: Option<String>) -> Result<ServiceOrder> {
        let order = self.require_order(order_id).await?;
        if !order.status.can_cancel() {
            return Err(OficinaError::InvalidTransition(format!(
                "order {} is {} and cannot be canceled",
                order.number, order.status
            )));
        }
        let note = annotation("Cancelamento", note);
        let order = self.store.cancel_order(order_id, note).await?;
        info!(order = %order.number, "order canceled");
        Ok(order)
    }

    /// Cancel an issued invoice.
    pub async fn cancel_invoice(&self, invoice_id: i64) -> Result<Invoice> {
        let invoice = self
            .invoices
            .get_by_id(invoice_id)
            .await?
            .ok_or_else(|| OficinaError::NotFound(format!("invoice {invoice_id} not found")))?;
        if !invoice.status.can_cancel() {
            return Err(OficinaError::InvalidTransition(format!(
                "invoice {} is already canceled",
                invoice.number
            )));
        }
        let invoice = self.store.cancel_invoice(invoice_id).await?;
        info!(invoice = %invoice.number, "invoice canceled");
        Ok(invoice)
    }

    /// Get an order by ID.
    pub async fn get_order(&self, order_id: i64) -> Result<ServiceOrder> {
        self.require_order(order_id).await
    }

    /// Page through orders, newest first.
    pub async fn list_orders(
        &self,
        filter: &OrderFilter,
        page: u32,
    ) -> Result<Page<ServiceOrderSummary>> {
        self.orders.list(filter, page).await
    }

    /// Contract attached to an order, if the order has one.
    pub async fn order_contract(&self, order_id: i64) -> Result<Option<Contract>> {
        self.require_order(order_id).await?;
        self.contracts.get_by_order(order_id).await
    }

    /// Get an invoice by ID.
    pub async fn get_invoice(&self, invoice_id: i64) -> Result<Invoice> {
        self.invoices
            .get_by_id(invoice_id)
            .await?
            .ok_or_else(|| OficinaError::NotFound(format!("invoice {invoice_id} not found")))
    }

    /// Page through invoices, newest first.
    pub async fn list_invoices(
        &self,
        filter: &InvoiceFilter,
        page: u32,
    ) -> Result<Page<InvoiceSummary>> {
        self.invoices.list(filter, page).await
    }

    async fn require_quote(&self, quote_id: i64) -> Result<Quote> {
        self.quotes
            .get_by_id(quote_id)
            .await?
            .ok_or_else(|| OficinaError::NotFound(format!("quote {quote_id} not found")))
    }

    async fn require_order(&self, order_id: i64) -> Result<ServiceOrder> {
        self.orders
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| OficinaError::NotFound(format!("order {order_id} not found")))
    }
}

/// Formats an operator note as an appended annotation block, or `None` when
/// the note is empty.
fn annotation(label: &str, note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .map(|n| format!("\n\n{label}: {n}"))
}
