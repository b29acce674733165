//! Reporting and dashboard types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::order::{ServiceOrderStatus, ServiceOrderSummary};
use crate::types::quote::QuoteSummary;

/// Raw report filters exactly as a caller sent them
///
/// Dates are strings on purpose: an unparseable date means "filter not
/// applied", never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Parsed service-report filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceReportFilter {
    pub start_date: Option<NaiveDate>,
    /// Inclusive; extended to 23:59:59 of this day.
    pub end_date: Option<NaiveDate>,
    pub client_id: Option<i64>,
    pub status: Option<ServiceOrderStatus>,
}

impl ServiceReportFilter {
    /// Parses raw query values, silently dropping anything invalid.
    pub fn from_query(query: &ReportQuery) -> Self {
        let parse_date =
            |value: &Option<String>| -> Option<NaiveDate> {
                value.as_deref().and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            };
        Self {
            start_date: parse_date(&query.start_date),
            end_date: parse_date(&query.end_date),
            client_id: query.client_id,
            status: query.status.as_deref().and_then(|s| s.parse().ok()),
        }
    }

    /// Inclusive epoch-second window over order opening time.
    ///
    /// The start date begins at midnight, the end date runs through
    /// 23:59:59 so a single-day filter still matches that day's orders.
    pub fn opened_bounds(&self) -> (Option<i64>, Option<i64>) {
        let from = self
            .start_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp());
        let until = self
            .end_date
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .map(|dt| dt.and_utc().timestamp());
        (from, until)
    }
}

/// Aggregated figures over a set of report rows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceReportStats {
    pub total_services: u64,
    /// Sum of the quote totals of every row, regardless of status.
    pub total_value: Decimal,
    pub created: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub canceled: u64,
}

impl ServiceReportStats {
    /// Aggregates stats over report rows.
    pub fn compute(rows: &[ServiceOrderSummary]) -> Self {
        let mut stats = Self { total_services: rows.len() as u64, ..Self::default() };
        for row in rows {
            stats.total_value += row.total_value;
            match row.order.status {
                ServiceOrderStatus::Created => stats.created += 1,
                ServiceOrderStatus::InProgress => stats.in_progress += 1,
                ServiceOrderStatus::Completed => stats.completed += 1,
                ServiceOrderStatus::Canceled => stats.canceled += 1,
            }
        }
        stats
    }
}

/// Point-in-time overview for the landing screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub total_clients: u64,
    pub total_materials: u64,
    pub total_quotes: u64,
    pub pending_quotes: u64,
    pub total_orders: u64,
    pub orders_created: u64,
    pub orders_in_progress: u64,
    pub orders_completed: u64,
    pub orders_canceled: u64,
    pub total_invoices: u64,
    /// Quote totals of orders completed inside the revenue window.
    pub revenue_last_30_days: Decimal,
    /// Materials at or below their minimum stock.
    pub low_stock_materials: u64,
    pub recent_quotes: Vec<QuoteSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::order::ServiceOrder;

    #[test]
    fn invalid_dates_are_dropped() {
        let query = ReportQuery {
            start_date: Some("2026-02-31".to_string()),
            end_date: Some("not-a-date".to_string()),
            client_id: Some(7),
            status: Some("completed".to_string()),
        };
        let filter = ServiceReportFilter::from_query(&query);
        assert_eq!(filter.start_date, None);
        assert_eq!(filter.end_date, None);
        assert_eq!(filter.client_id, Some(7));
        assert_eq!(filter.status, Some(ServiceOrderStatus::Completed));
    }

    #[test]
    fn unknown_status_is_dropped() {
        let query = ReportQuery { status: Some("archived".to_string()), ..Default::default() };
        assert_eq!(ServiceReportFilter::from_query(&query).status, None);
    }

    #[test]
    fn end_date_extends_to_end_of_day() {
        let query = ReportQuery {
            start_date: Some("2026-03-10".to_string()),
            end_date: Some("2026-03-10".to_string()),
            ..Default::default()
        };
        let filter = ServiceReportFilter::from_query(&query);
        let (from, until) = filter.opened_bounds();
        let from = from.unwrap();
        let until = until.unwrap();
        assert_eq!(until - from, 86_399);
    }

    fn row(status: ServiceOrderStatus, total: &str) -> ServiceOrderSummary {
        ServiceOrderSummary {
            order: ServiceOrder {
                id: 1,
                number: "OS20260001".to_string(),
                quote_id: 1,
                status,
                opened_at: 0,
                started_at: None,
                completed_at: None,
                notes: None,
            },
            quote_number: "ORC20260001".to_string(),
            client_name: "Ana".to_string(),
            service_description: "Funilaria".to_string(),
            total_value: total.parse().unwrap(),
        }
    }

    #[test]
    fn stats_count_by_status_and_sum_all_rows() {
        let rows = vec![
            row(ServiceOrderStatus::Completed, "100.00"),
            row(ServiceOrderStatus::Completed, "50.50"),
            row(ServiceOrderStatus::InProgress, "10.00"),
            row(ServiceOrderStatus::Canceled, "1.00"),
        ];
        let stats = ServiceReportStats::compute(&rows);
        assert_eq!(stats.total_services, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.canceled, 1);
        assert_eq!(stats.created, 0);
        assert_eq!(stats.total_value, "161.50".parse().unwrap());
    }
}
