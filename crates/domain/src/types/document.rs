//! Rendering contract types
//!
//! The document service resolves an entity into one of these payloads; a
//! renderer turns the payload into bytes. Renderers never touch the store
//! and never apply business rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::client::Client;
use crate::types::material::Material;
use crate::types::order::{Contract, Invoice, ServiceOrder, ServiceOrderSummary};
use crate::types::quote::{Quote, QuoteLineItem};
use crate::types::report::{ServiceReportFilter, ServiceReportStats};
use crate::types::user::User;

/// MIME type of PDF artifacts.
pub const PDF_MIME: &str = "application/pdf";
/// MIME type of XLSX artifacts.
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Finished artifact produced by a renderer
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    /// Suggested download filename (entity number plus render timestamp).
    pub filename: String,
}

/// Quote line resolved with its material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteDocumentItem {
    pub item: QuoteLineItem,
    pub material: Material,
}

/// Fully resolved quote aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteDocument {
    pub quote: Quote,
    pub client: Client,
    pub issuer: User,
    pub items: Vec<QuoteDocumentItem>,
}

/// Fully resolved service order aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDocument {
    pub order: ServiceOrder,
    pub quote: Quote,
    pub client: Client,
}

/// Fully resolved contract aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractDocument {
    pub contract: Contract,
    pub order: ServiceOrder,
    pub quote: Quote,
    pub client: Client,
}

/// Fully resolved invoice aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDocument {
    pub invoice: Invoice,
    pub order: ServiceOrder,
    pub quote: Quote,
    pub client: Client,
}

/// Filtered service report ready for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceReportDocument {
    pub filter: ServiceReportFilter,
    pub rows: Vec<ServiceOrderSummary>,
    pub stats: ServiceReportStats,
    pub generated_at: i64,
}

impl ServiceReportDocument {
    /// Get generation time as DateTime<Utc>
    pub fn generated_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.generated_at, 0)
    }
}

/// Renderable payload, fully resolved by the document service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DocumentPayload {
    Quote(QuoteDocument),
    Order(OrderDocument),
    Contract(ContractDocument),
    Invoice(InvoiceDocument),
    ServiceReport(ServiceReportDocument),
}

impl DocumentPayload {
    /// Filename stem: document kind plus entity number where there is one.
    pub fn slug(&self) -> String {
        match self {
            Self::Quote(doc) => format!("orcamento_{}", doc.quote.number),
            Self::Order(doc) => format!("ordem_servico_{}", doc.order.number),
            Self::Contract(doc) => format!("contrato_{}", doc.contract.number),
            Self::Invoice(doc) => format!("nota_fiscal_{}", doc.invoice.number),
            Self::ServiceReport(_) => "relatorio_servicos".to_string(),
        }
    }
}

/// Builds the suggested filename for a rendered artifact.
pub fn suggested_filename(slug: &str, extension: &str, at: DateTime<Utc>) -> String {
    format!("{slug}_{}.{extension}", at.format("%Y%m%d_%H%M%S"))
}
