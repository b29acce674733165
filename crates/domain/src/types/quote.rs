//! Quote types and totals math
//!
//! A quote owns its line items; each item snapshots the material price at
//! issue time so later catalog changes never move an issued total. The total
//! is always derived here, never trusted from a caller:
//! `total = sum(line subtotals) + labor`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::impl_status_str;

/// Quote lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Pending,
    Accepted,
    Rejected,
}

impl_status_str!(QuoteStatus {
    Pending => "pending",
    Accepted => "accepted",
    Rejected => "rejected",
});

impl QuoteStatus {
    /// Whether the quote contents can still change.
    pub const fn is_editable(self) -> bool {
        match self {
            Self::Pending => true,
            Self::Accepted | Self::Rejected => false,
        }
    }

    /// Whether accept/reject is still open.
    pub const fn is_decidable(self) -> bool {
        match self {
            Self::Pending => true,
            Self::Accepted | Self::Rejected => false,
        }
    }

    /// Whether the quote may be deleted. Accepted quotes are anchored by
    /// their service order and must stay.
    pub const fn is_deletable(self) -> bool {
        match self {
            Self::Pending | Self::Rejected => true,
            Self::Accepted => false,
        }
    }

    /// Label used in rendered documents.
    pub const fn report_label(self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Accepted => "Aceito",
            Self::Rejected => "Rejeitado",
        }
    }
}

/// Issued quote header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: i64,
    /// Human-readable number (`ORC<year><seq>`), unique.
    pub number: String,
    pub client_id: i64,
    /// Issuing user.
    pub user_id: i64,
    pub service_description: String,
    pub labor_value: Decimal,
    /// Derived: sum of item subtotals plus labor.
    pub total_value: Decimal,
    pub status: QuoteStatus,
    pub issued_at: i64,
    pub valid_until: NaiveDate,
    pub notes: Option<String>,
}

impl Quote {
    /// Get issue time as DateTime<Utc>
    pub fn issued_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.issued_at, 0)
    }
}

/// Persisted quote line item with its price snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteLineItem {
    pub id: i64,
    pub quote_id: i64,
    pub material_id: i64,
    pub quantity: Decimal,
    /// Material price captured when the quote was issued or edited.
    pub unit_price: Decimal,
    /// Derived: quantity x unit price.
    pub subtotal: Decimal,
}

/// Line item as submitted by a caller. A missing `unit_price` means
/// "snapshot the material's current price".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuoteItem {
    pub material_id: i64,
    pub quantity: Decimal,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
}

/// Fully priced line ready for persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteItemDraft {
    pub material_id: i64,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl QuoteItemDraft {
    /// Builds a draft line, computing the subtotal.
    pub fn price(material_id: i64, quantity: Decimal, unit_price: Decimal) -> Self {
        Self { material_id, quantity, unit_price, subtotal: line_subtotal(quantity, unit_price) }
    }
}

/// Payload for issuing a quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuote {
    pub client_id: i64,
    pub user_id: i64,
    pub service_description: String,
    #[serde(default)]
    pub labor_value: Decimal,
    /// Days the quote stays valid; the configured default applies when
    /// omitted.
    #[serde(default)]
    pub validity_days: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    pub items: Vec<NewQuoteItem>,
}

/// Listing row: quote plus the client name resolved by the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub quote: Quote,
    pub client_name: String,
}

/// Line subtotal: quantity x unit price.
pub fn line_subtotal(quantity: Decimal, unit_price: Decimal) -> Decimal {
    quantity * unit_price
}

/// Quote total: sum of line subtotals plus labor.
pub fn quote_total(items: &[QuoteItemDraft], labor_value: Decimal) -> Decimal {
    items.iter().map(|item| item.subtotal).sum::<Decimal>() + labor_value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn subtotal_is_quantity_times_price() {
        assert_eq!(line_subtotal(dec("2"), dec("50.00")), dec("100.00"));
        assert_eq!(line_subtotal(dec("1.5"), dec("10.00")), dec("15.000"));
    }

    #[test]
    fn total_sums_items_and_labor() {
        let items = vec![
            QuoteItemDraft::price(1, dec("2"), dec("50.00")),
            QuoteItemDraft::price(2, dec("3"), dec("10.00")),
        ];
        assert_eq!(quote_total(&items, dec("100.00")), dec("230.00"));
    }

    #[test]
    fn total_without_items_is_labor() {
        assert_eq!(quote_total(&[], dec("80.00")), dec("80.00"));
    }

    #[test]
    fn decimal_totals_do_not_drift() {
        // 0.1 + 0.2 style sums stay exact with decimal arithmetic.
        let items: Vec<QuoteItemDraft> =
            (0..10).map(|_| QuoteItemDraft::price(1, dec("1"), dec("0.10"))).collect();
        assert_eq!(quote_total(&items, Decimal::ZERO), dec("1.00"));
    }

    #[test]
    fn pending_is_the_only_mutable_status() {
        assert!(QuoteStatus::Pending.is_editable());
        assert!(QuoteStatus::Pending.is_decidable());
        assert!(!QuoteStatus::Accepted.is_editable());
        assert!(!QuoteStatus::Rejected.is_decidable());
    }

    #[test]
    fn accepted_quotes_cannot_be_deleted() {
        assert!(QuoteStatus::Pending.is_deletable());
        assert!(QuoteStatus::Rejected.is_deletable());
        assert!(!QuoteStatus::Accepted.is_deletable());
    }
}
