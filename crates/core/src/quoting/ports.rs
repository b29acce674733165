//! Port interfaces for quote persistence
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations for quotes and their line items.

use async_trait::async_trait;
use chrono::NaiveDate;
use oficina_domain::{
    NewQuoteItem, Page, Quote, QuoteItemDraft, QuoteLineItem, QuoteStatus, QuoteSummary, Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Quote header plus priced lines, ready for atomic insertion
///
/// Totals are already derived by the quote service; the repository assigns
/// the document number and persists everything in one transaction.
#[derive(Debug, Clone)]
pub struct NewQuoteRecord {
    pub client_id: i64,
    pub user_id: i64,
    pub service_description: String,
    pub labor_value: Decimal,
    pub total_value: Decimal,
    pub issued_at: i64,
    pub valid_until: NaiveDate,
    pub notes: Option<String>,
    pub items: Vec<QuoteItemDraft>,
}

/// Replacement contents for a pending quote
#[derive(Debug, Clone)]
pub struct QuoteUpdate {
    pub service_description: String,
    pub labor_value: Decimal,
    pub total_value: Decimal,
    pub valid_until: NaiveDate,
    pub notes: Option<String>,
    pub items: Vec<QuoteItemDraft>,
}

/// Caller-facing revision of a pending quote (client and issuer are fixed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRevision {
    pub service_description: String,
    #[serde(default)]
    pub labor_value: Decimal,
    #[serde(default)]
    pub validity_days: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    pub items: Vec<NewQuoteItem>,
}

/// Listing filter for quotes
#[derive(Debug, Clone, Default)]
pub struct QuoteFilter {
    /// Contains-search over number, client name and service description.
    pub search: Option<String>,
    pub status: Option<QuoteStatus>,
}

/// Trait for quote persistence and retrieval
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Insert header and items atomically, assigning the next quote number
    async fn create(&self, record: NewQuoteRecord) -> Result<Quote>;

    /// Replace the contents of a pending quote atomically. The pending
    /// status is re-checked inside the transaction.
    async fn update(&self, id: i64, update: QuoteUpdate) -> Result<Quote>;

    /// Get a quote by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Quote>>;

    /// Line items of a quote, in insertion order
    async fn items(&self, quote_id: i64) -> Result<Vec<QuoteLineItem>>;

    /// Page through quotes, newest first
    async fn list(&self, filter: &QuoteFilter, page: u32) -> Result<Page<QuoteSummary>>;

    /// Delete a non-accepted quote and its items atomically. The status
    /// gate is re-checked inside the transaction.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Total number of quotes
    async fn count(&self) -> Result<u64>;

    /// Number of quotes in `status`
    async fn count_by_status(&self, status: QuoteStatus) -> Result<u64>;

    /// Most recently issued quotes
    async fn recent(&self, limit: u32) -> Result<Vec<QuoteSummary>>;
}
