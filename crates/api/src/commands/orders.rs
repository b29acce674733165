//! Service order lifecycle commands

use oficina_core::{CompletedOrder, OrderFilter};
use oficina_domain::{
    Contract, ContractDocument, OrderDocument, Page, RenderedDocument, Result, ServiceOrder,
    ServiceOrderSummary,
};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_logged;

/// Start work on a created order.
pub async fn start_order(context: &AppContext, id: i64) -> Result<ServiceOrder> {
    execute_logged("orders::start_order", context.lifecycle.start_order(id)).await
}

/// Complete an in-progress order, issuing its invoice.
pub async fn complete_order(
    context: &AppContext,
    id: i64,
    note: Option<String>,
) -> Result<CompletedOrder> {
    execute_logged("orders::complete_order", context.lifecycle.complete_order(id, note)).await
}

/// Cancel a created or in-progress order along with its contract.
pub async fn cancel_order(
    context: &AppContext,
    id: i64,
    note: Option<String>,
) -> Result<ServiceOrder> {
    execute_logged("orders::cancel_order", context.lifecycle.cancel_order(id, note)).await
}

/// Get an order by ID.
pub async fn get_order(context: &AppContext, id: i64) -> Result<ServiceOrder> {
    execute_logged("orders::get_order", context.lifecycle.get_order(id)).await
}

/// Page through orders, newest first.
pub async fn list_orders(
    context: &AppContext,
    filter: OrderFilter,
    page: u32,
) -> Result<Page<ServiceOrderSummary>> {
    execute_logged("orders::list_orders", async move {
        context.lifecycle.list_orders(&filter, page).await
    })
    .await
}

/// Contract attached to an order, if the order has one.
pub async fn get_order_contract(context: &AppContext, id: i64) -> Result<Option<Contract>> {
    execute_logged("orders::get_order_contract", context.lifecycle.order_contract(id)).await
}

/// Fully resolved order aggregate: quote and client context.
pub async fn get_order_document(context: &AppContext, id: i64) -> Result<OrderDocument> {
    execute_logged("orders::get_order_document", context.documents.order_document(id)).await
}

/// Fully resolved contract aggregate for an order.
pub async fn get_contract_document(context: &AppContext, id: i64) -> Result<ContractDocument> {
    execute_logged("orders::get_contract_document", context.documents.contract_document(id)).await
}

/// Render the printable service order PDF.
pub async fn render_order_pdf(context: &AppContext, id: i64) -> Result<RenderedDocument> {
    execute_logged("orders::render_order_pdf", context.documents.order_pdf(id)).await
}

/// Render the printable contract PDF for an order.
pub async fn render_contract_pdf(context: &AppContext, id: i64) -> Result<RenderedDocument> {
    execute_logged("orders::render_contract_pdf", context.documents.contract_pdf(id)).await
}
