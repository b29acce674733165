//! Invoice commands

use oficina_core::InvoiceFilter;
use oficina_domain::{Invoice, InvoiceDocument, InvoiceSummary, Page, RenderedDocument, Result};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_logged;

/// Get an invoice by ID.
pub async fn get_invoice(context: &AppContext, id: i64) -> Result<Invoice> {
    execute_logged("invoices::get_invoice", context.lifecycle.get_invoice(id)).await
}

/// Page through invoices, newest first.
pub async fn list_invoices(
    context: &AppContext,
    filter: InvoiceFilter,
    page: u32,
) -> Result<Page<InvoiceSummary>> {
    execute_logged("invoices::list_invoices", async move {
        context.lifecycle.list_invoices(&filter, page).await
    })
    .await
}

/// Cancel an issued invoice.
pub async fn cancel_invoice(context: &AppContext, id: i64) -> Result<Invoice> {
    execute_logged("invoices::cancel_invoice", context.lifecycle.cancel_invoice(id)).await
}

/// Fully resolved invoice aggregate: order, quote and client context.
pub async fn get_invoice_document(context: &AppContext, id: i64) -> Result<InvoiceDocument> {
    execute_logged("invoices::get_invoice_document", context.documents.invoice_document(id)).await
}

/// Render the printable invoice PDF.
pub async fn render_invoice_pdf(context: &AppContext, id: i64) -> Result<RenderedDocument> {
    execute_logged("invoices::render_invoice_pdf", context.documents.invoice_pdf(id)).await
}
