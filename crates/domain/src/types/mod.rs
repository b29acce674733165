//! Domain types and models

pub mod client;
pub mod document;
pub mod material;
pub mod order;
pub mod page;
pub mod quote;
pub mod report;
pub mod user;

pub use client::{Client, NewClient};
pub use document::{
    suggested_filename, ContractDocument, DocumentPayload, InvoiceDocument, OrderDocument,
    QuoteDocument, QuoteDocumentItem, RenderedDocument, ServiceReportDocument, PDF_MIME, XLSX_MIME,
};
pub use material::{Material, NewMaterial};
pub use order::{
    Contract, ContractStatus, Invoice, InvoiceStatus, InvoiceSummary, ServiceOrder,
    ServiceOrderStatus, ServiceOrderSummary,
};
pub use page::{list_offset, Page};
pub use quote::{
    line_subtotal, quote_total, NewQuote, NewQuoteItem, Quote, QuoteItemDraft, QuoteLineItem,
    QuoteStatus, QuoteSummary,
};
pub use report::{DashboardSnapshot, ReportQuery, ServiceReportFilter, ServiceReportStats};
pub use user::{NewUser, User};
