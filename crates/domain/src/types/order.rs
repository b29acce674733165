//! Service order, contract and invoice types
//!
//! These three entities only ever exist downstream of an accepted quote:
//! accepting creates the order and its contract, completing the order issues
//! the invoice. Transition legality is decided by the status methods below;
//! the store re-checks them inside its transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::impl_status_str;

/// Service order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceOrderStatus {
    /// Order exists but work has not started.
    Created,
    InProgress,
    Completed,
    Canceled,
}

impl_status_str!(ServiceOrderStatus {
    Created => "created",
    InProgress => "in_progress",
    Completed => "completed",
    Canceled => "canceled",
});

impl ServiceOrderStatus {
    /// Whether `start` is legal from this status.
    pub const fn can_start(self) -> bool {
        match self {
            Self::Created => true,
            Self::InProgress | Self::Completed | Self::Canceled => false,
        }
    }

    /// Whether `complete` is legal from this status.
    pub const fn can_complete(self) -> bool {
        match self {
            Self::InProgress => true,
            Self::Created | Self::Completed | Self::Canceled => false,
        }
    }

    /// Whether `cancel` is legal from this status.
    pub const fn can_cancel(self) -> bool {
        match self {
            Self::Created | Self::InProgress => true,
            Self::Completed | Self::Canceled => false,
        }
    }

    /// Label used in rendered documents.
    pub const fn report_label(self) -> &'static str {
        match self {
            Self::Created => "Criada",
            Self::InProgress => "Em Andamento",
            Self::Completed => "Concluída",
            Self::Canceled => "Cancelada",
        }
    }
}

/// Service order opened from an accepted quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub id: i64,
    /// Human-readable number (`OS<year><seq>`), unique.
    pub number: String,
    /// Originating quote; exactly one order per quote.
    pub quote_id: i64,
    pub status: ServiceOrderStatus,
    pub opened_at: i64,
    pub started_at: Option<i64>,
    pub completed_at: Option<i64>,
    /// Append-only annotations (creation, completion, cancellation).
    pub notes: Option<String>,
}

impl ServiceOrder {
    /// Get opening time as DateTime<Utc>
    pub fn opened_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.opened_at, 0)
    }

    /// Get work start time as DateTime<Utc>
    pub fn started_at_utc(&self) -> Option<DateTime<Utc>> {
        self.started_at.and_then(|ts| DateTime::from_timestamp(ts, 0))
    }

    /// Get completion time as DateTime<Utc>
    pub fn completed_at_utc(&self) -> Option<DateTime<Utc>> {
        self.completed_at.and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}

/// Contract lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Active,
    Canceled,
}

impl_status_str!(ContractStatus {
    Active => "active",
    Canceled => "canceled",
});

impl ContractStatus {
    /// Label used in rendered documents.
    pub const fn report_label(self) -> &'static str {
        match self {
            Self::Active => "Ativo",
            Self::Canceled => "Cancelado",
        }
    }
}

/// Service contract generated alongside a service order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: i64,
    /// Human-readable number (`CT<year><seq>`), unique.
    pub number: String,
    /// Owning service order; at most one contract per order.
    pub order_id: i64,
    pub terms: String,
    pub status: ContractStatus,
    pub created_at: i64,
}

impl Contract {
    /// Get creation time as DateTime<Utc>
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }
}

/// Invoice lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Issued,
    Canceled,
}

impl_status_str!(InvoiceStatus {
    Issued => "issued",
    Canceled => "canceled",
});

impl InvoiceStatus {
    /// Whether `cancel` is legal from this status.
    pub const fn can_cancel(self) -> bool {
        match self {
            Self::Issued => true,
            Self::Canceled => false,
        }
    }

    /// Label used in rendered documents.
    pub const fn report_label(self) -> &'static str {
        match self {
            Self::Issued => "Emitida",
            Self::Canceled => "Cancelada",
        }
    }
}

/// Invoice issued on order completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    /// Human-readable number (`NF<year><seq>`), unique.
    pub number: String,
    /// Completed service order; at most one invoice per order.
    pub order_id: i64,
    /// Copied from the quote total at issue time.
    pub total_value: Decimal,
    pub status: InvoiceStatus,
    pub issued_at: i64,
}

impl Invoice {
    /// Get issue time as DateTime<Utc>
    pub fn issued_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.issued_at, 0)
    }
}

/// Listing/report row: order with quote and client context resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOrderSummary {
    pub order: ServiceOrder,
    pub quote_number: String,
    pub client_name: String,
    /// Service description of the originating quote.
    pub service_description: String,
    /// Total of the originating quote.
    pub total_value: Decimal,
}

/// Listing row: invoice with order and client context resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub invoice: Invoice,
    pub order_number: String,
    pub client_name: String,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn start_only_from_created() {
        assert!(ServiceOrderStatus::Created.can_start());
        assert!(!ServiceOrderStatus::InProgress.can_start());
        assert!(!ServiceOrderStatus::Completed.can_start());
        assert!(!ServiceOrderStatus::Canceled.can_start());
    }

    #[test]
    fn complete_only_from_in_progress() {
        assert!(ServiceOrderStatus::InProgress.can_complete());
        assert!(!ServiceOrderStatus::Created.can_complete());
        assert!(!ServiceOrderStatus::Completed.can_complete());
        assert!(!ServiceOrderStatus::Canceled.can_complete());
    }

    #[test]
    fn completed_and_canceled_orders_cannot_cancel() {
        assert!(ServiceOrderStatus::Created.can_cancel());
        assert!(ServiceOrderStatus::InProgress.can_cancel());
        assert!(!ServiceOrderStatus::Completed.can_cancel());
        assert!(!ServiceOrderStatus::Canceled.can_cancel());
    }

    #[test]
    fn invoice_cancel_is_single_shot() {
        assert!(InvoiceStatus::Issued.can_cancel());
        assert!(!InvoiceStatus::Canceled.can_cancel());
    }

    #[test]
    fn status_strings_round_trip() {
        for status in [
            ServiceOrderStatus::Created,
            ServiceOrderStatus::InProgress,
            ServiceOrderStatus::Completed,
            ServiceOrderStatus::Canceled,
        ] {
            assert_eq!(ServiceOrderStatus::from_str(&status.to_string()).unwrap(), status);
        }
        assert_eq!(ContractStatus::from_str("ACTIVE").unwrap(), ContractStatus::Active);
        assert_eq!(InvoiceStatus::from_str("issued").unwrap(), InvoiceStatus::Issued);
    }
}
