//! Quote issuance and decision commands

use oficina_core::{AcceptedQuote, QuoteFilter, QuoteRevision};
use oficina_domain::{
    NewQuote, Page, Quote, QuoteDocument, QuoteLineItem, QuoteSummary, RenderedDocument, Result,
};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_logged;

/// Issue a new quote. Items without an explicit unit price snapshot the
/// material's current catalog price; the total is always derived.
pub async fn create_quote(context: &AppContext, input: NewQuote) -> Result<Quote> {
    execute_logged("quotes::create_quote", context.quotes.create_quote(input)).await
}

/// Replace the contents of a pending quote, recomputing its total.
pub async fn revise_quote(context: &AppContext, id: i64, revision: QuoteRevision) -> Result<Quote> {
    execute_logged("quotes::revise_quote", context.quotes.revise_quote(id, revision)).await
}

/// Get a quote header by ID.
pub async fn get_quote(context: &AppContext, id: i64) -> Result<Quote> {
    execute_logged("quotes::get_quote", context.quotes.get_quote(id)).await
}

/// Line items of a quote, in insertion order.
pub async fn get_quote_items(context: &AppContext, id: i64) -> Result<Vec<QuoteLineItem>> {
    execute_logged("quotes::get_quote_items", context.quotes.quote_items(id)).await
}

/// Fully resolved quote aggregate: client, issuer and priced items.
pub async fn get_quote_document(context: &AppContext, id: i64) -> Result<QuoteDocument> {
    execute_logged("quotes::get_quote_document", context.documents.quote_document(id)).await
}

/// Page through quotes, newest first.
pub async fn list_quotes(
    context: &AppContext,
    filter: QuoteFilter,
    page: u32,
) -> Result<Page<QuoteSummary>> {
    execute_logged("quotes::list_quotes", async move {
        context.quotes.list_quotes(&filter, page).await
    })
    .await
}

/// Delete a quote and its items. Blocked once the quote was accepted.
pub async fn delete_quote(context: &AppContext, id: i64) -> Result<()> {
    execute_logged("quotes::delete_quote", context.quotes.delete_quote(id)).await
}

/// Accept a pending quote, opening its service order and contract.
pub async fn accept_quote(context: &AppContext, id: i64) -> Result<AcceptedQuote> {
    execute_logged("quotes::accept_quote", context.lifecycle.accept_quote(id)).await
}

/// Reject a pending quote.
pub async fn reject_quote(context: &AppContext, id: i64) -> Result<Quote> {
    execute_logged("quotes::reject_quote", context.lifecycle.reject_quote(id)).await
}

/// Render the printable quote PDF.
pub async fn render_quote_pdf(context: &AppContext, id: i64) -> Result<RenderedDocument> {
    execute_logged("quotes::render_quote_pdf", context.documents.quote_pdf(id)).await
}
