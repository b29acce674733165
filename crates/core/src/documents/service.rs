//! Document service - aggregate resolution and renderer dispatch
//!
//! Resolves entities into self-contained payloads (every name, price and
//! date a renderer needs), then hands them to the configured renderer on the
//! blocking pool. Referential integrity is enforced at write time, so a
//! dangling reference here is reported as an internal inconsistency.

use std::sync::Arc;

use oficina_domain::{
    Client, ContractDocument, DocumentPayload, InvoiceDocument, OficinaError, OrderDocument, Quote,
    QuoteDocument, QuoteDocumentItem, RenderedDocument, Result, ServiceOrder,
    ServiceReportDocument,
};
use tokio::task;

use super::ports::DocumentRenderer;
use crate::catalog::ports::{ClientRepository, MaterialRepository};
use crate::lifecycle::ports::{ContractRepository, InvoiceRepository, ServiceOrderRepository};
use crate::quoting::ports::QuoteRepository;
use crate::user::ports::UserRepository;

/// Document service
pub struct DocumentService {
    quotes: Arc<dyn QuoteRepository>,
    clients: Arc<dyn ClientRepository>,
    users: Arc<dyn UserRepository>,
    materials: Arc<dyn MaterialRepository>,
    orders: Arc<dyn ServiceOrderRepository>,
    contracts: Arc<dyn ContractRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    renderer: Arc<dyn DocumentRenderer>,
}

impl DocumentService {
    /// Create a new document service
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        quotes: Arc<dyn QuoteRepository>,
        clients: Arc<dyn ClientRepository>,
        users: Arc<dyn UserRepository>,
        materials: Arc<dyn MaterialRepository>,
        orders: Arc<dyn ServiceOrderRepository>,
        contracts: Arc<dyn ContractRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        Self { quotes, clients, users, materials, orders, contracts, invoices, renderer }
    }

    /// Resolve a quote with client, issuer and priced items.
    pub async fn quote_document(&self, quote_id: i64) -> Result<QuoteDocument> {
        let quote = self
            .quotes
            .get_by_id(quote_id)
            .await?
            .ok_or_else(|| OficinaError::NotFound(format!("quote {quote_id} not found")))?;
        let client = self.require_client(quote.client_id, &quote.number).await?;
        let issuer = self.users.get_by_id(quote.user_id).await?.ok_or_else(|| {
            OficinaError::Internal(format!(
                "quote {} references missing user {}",
                quote.number, quote.user_id
            ))
        })?;

        let mut items = Vec::new();
        for item in self.quotes.items(quote.id).await? {
            let material = self.materials.get_by_id(item.material_id).await?.ok_or_else(|| {
                OficinaError::Internal(format!(
                    "quote {} references missing material {}",
                    quote.number, item.material_id
                ))
            })?;
            items.push(QuoteDocumentItem { item, material });
        }

        Ok(QuoteDocument { quote, client, issuer, items })
    }

    /// Resolve a service order with its quote and client.
    pub async fn order_document(&self, order_id: i64) -> Result<OrderDocument> {
        let order = self.require_order(order_id).await?;
        let (quote, client) = self.order_context(&order).await?;
        Ok(OrderDocument { order, quote, client })
    }

    /// Resolve the contract attached to an order.
    pub async fn contract_document(&self, order_id: i64) -> Result<ContractDocument> {
        let order = self.require_order(order_id).await?;
        let contract = self.contracts.get_by_order(order.id).await?.ok_or_else(|| {
            OficinaError::NotFound(format!("order {} has no contract", order.number))
        })?;
        let (quote, client) = self.order_context(&order).await?;
        Ok(ContractDocument { contract, order, quote, client })
    }

    /// Resolve an invoice with its order, quote and client.
    pub async fn invoice_document(&self, invoice_id: i64) -> Result<InvoiceDocument> {
        let invoice = self
            .invoices
            .get_by_id(invoice_id)
            .await?
            .ok_or_else(|| OficinaError::NotFound(format!("invoice {invoice_id} not found")))?;
        let order = self.orders.get_by_id(invoice.order_id).await?.ok_or_else(|| {
            OficinaError::Internal(format!(
                "invoice {} references missing order {}",
                invoice.number, invoice.order_id
            ))
        })?;
        let (quote, client) = self.order_context(&order).await?;
        Ok(InvoiceDocument { invoice, order, quote, client })
    }

    /// Render a quote as PDF.
    pub async fn quote_pdf(&self, quote_id: i64) -> Result<RenderedDocument> {
        let doc = self.quote_document(quote_id).await?;
        self.dispatch_pdf(DocumentPayload::Quote(doc)).await
    }

    /// Render a service order as PDF.
    pub async fn order_pdf(&self, order_id: i64) -> Result<RenderedDocument> {
        let doc = self.order_document(order_id).await?;
        self.dispatch_pdf(DocumentPayload::Order(doc)).await
    }

    /// Render the contract of an order as PDF.
    pub async fn contract_pdf(&self, order_id: i64) -> Result<RenderedDocument> {
        let doc = self.contract_document(order_id).await?;
        self.dispatch_pdf(DocumentPayload::Contract(doc)).await
    }

    /// Render an invoice as PDF.
    pub async fn invoice_pdf(&self, invoice_id: i64) -> Result<RenderedDocument> {
        let doc = self.invoice_document(invoice_id).await?;
        self.dispatch_pdf(DocumentPayload::Invoice(doc)).await
    }

    /// Render a prepared service report as PDF.
    pub async fn report_pdf(&self, report: ServiceReportDocument) -> Result<RenderedDocument> {
        self.dispatch_pdf(DocumentPayload::ServiceReport(report)).await
    }

    /// Render a prepared service report as a spreadsheet.
    pub async fn report_sheet(&self, report: ServiceReportDocument) -> Result<RenderedDocument> {
        let renderer = Arc::clone(&self.renderer);
        task::spawn_blocking(move || renderer.render_sheet(&report))
            .await
            .map_err(|e| OficinaError::Internal(format!("render task failed: {e}")))?
    }

    async fn dispatch_pdf(&self, payload: DocumentPayload) -> Result<RenderedDocument> {
        let renderer = Arc::clone(&self.renderer);
        task::spawn_blocking(move || renderer.render_pdf(&payload))
            .await
            .map_err(|e| OficinaError::Internal(format!("render task failed: {e}")))?
    }

    async fn require_order(&self, order_id: i64) -> Result<ServiceOrder> {
        self.orders
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| OficinaError::NotFound(format!("order {order_id} not found")))
    }

    async fn require_client(&self, client_id: i64, owner: &str) -> Result<Client> {
        self.clients.get_by_id(client_id).await?.ok_or_else(|| {
            OficinaError::Internal(format!("{owner} references missing client {client_id}"))
        })
    }

    async fn order_context(&self, order: &ServiceOrder) -> Result<(Quote, Client)> {
        let quote = self.quotes.get_by_id(order.quote_id).await?.ok_or_else(|| {
            OficinaError::Internal(format!(
                "order {} references missing quote {}",
                order.number, order.quote_id
            ))
        })?;
        let client = self.require_client(quote.client_id, &quote.number).await?;
        Ok((quote, client))
    }
}
