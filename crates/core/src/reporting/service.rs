//! Report service - filtered service reports and dashboard figures
//!
//! Filters arrive as raw strings and are parsed leniently: an invalid date
//! or status simply drops that filter instead of failing the report.

use std::sync::Arc;

use chrono::{Duration, Utc};
use oficina_domain::constants::{RECENT_QUOTES_LIMIT, REVENUE_WINDOW_DAYS};
use oficina_domain::{
    DashboardSnapshot, QuoteStatus, ReportQuery, Result, ServiceOrderStatus, ServiceReportDocument,
    ServiceReportFilter, ServiceReportStats,
};

use crate::catalog::ports::{ClientRepository, MaterialRepository};
use crate::lifecycle::ports::{InvoiceRepository, ServiceOrderRepository};
use crate::quoting::ports::QuoteRepository;

/// Report service
pub struct ReportService {
    clients: Arc<dyn ClientRepository>,
    materials: Arc<dyn MaterialRepository>,
    quotes: Arc<dyn QuoteRepository>,
    orders: Arc<dyn ServiceOrderRepository>,
    invoices: Arc<dyn InvoiceRepository>,
}

impl ReportService {
    /// Create a new report service
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        materials: Arc<dyn MaterialRepository>,
        quotes: Arc<dyn QuoteRepository>,
        orders: Arc<dyn ServiceOrderRepository>,
        invoices: Arc<dyn InvoiceRepository>,
    ) -> Self {
        Self { clients, materials, quotes, orders, invoices }
    }

    /// Build the filtered service report with its aggregate stats.
    pub async fn service_report(&self, query: &ReportQuery) -> Result<ServiceReportDocument> {
        let filter = ServiceReportFilter::from_query(query);
        let rows = self.orders.report_rows(&filter).await?;
        let stats = ServiceReportStats::compute(&rows);
        Ok(ServiceReportDocument { filter, rows, stats, generated_at: Utc::now().timestamp() })
    }

    /// Point-in-time overview for the landing screen.
    pub async fn dashboard(&self) -> Result<DashboardSnapshot> {
        let revenue_cutoff =
            (Utc::now() - Duration::days(REVENUE_WINDOW_DAYS)).timestamp();

        Ok(DashboardSnapshot {
            total_clients: self.clients.count().await?,
            total_materials: self.materials.count().await?,
            total_quotes: self.quotes.count().await?,
            pending_quotes: self.quotes.count_by_status(QuoteStatus::Pending).await?,
            total_orders: self.orders.count().await?,
            orders_created: self.orders.count_by_status(ServiceOrderStatus::Created).await?,
            orders_in_progress: self
                .orders
                .count_by_status(ServiceOrderStatus::InProgress)
                .await?,
            orders_completed: self.orders.count_by_status(ServiceOrderStatus::Completed).await?,
            orders_canceled: self.orders.count_by_status(ServiceOrderStatus::Canceled).await?,
            total_invoices: self.invoices.count().await?,
            revenue_last_30_days: self.orders.revenue_since(revenue_cutoff).await?,
            low_stock_materials: self.materials.low_stock_count().await?,
            recent_quotes: self.quotes.recent(RECENT_QUOTES_LIMIT).await?,
        })
    }
}
