//! SQLite-backed service order queries.
//!
//! Read side only; every order mutation goes through the lifecycle store.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use oficina_core::{OrderFilter, ServiceOrderRepository};
use oficina_domain::constants::PAGE_SIZE;
use oficina_domain::{
    list_offset, OficinaError, Page, Result, ServiceOrder, ServiceOrderStatus, ServiceOrderSummary,
    ServiceReportFilter,
};
use rusqlite::{params, OptionalExtension, Row, ToSql};
use rust_decimal::Decimal;
use tokio::task;

use super::manager::DbManager;
use super::row::{decimal_column, status_column};
use crate::errors::{map_join_error, map_sql_error};

pub struct SqliteServiceOrderRepository {
    db: Arc<DbManager>,
}

impl SqliteServiceOrderRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ServiceOrderRepository for SqliteServiceOrderRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<ServiceOrder>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<ServiceOrder>> {
            let conn = db.get_connection()?;
            conn.query_row(ORDER_SELECT_BY_ID, params![id], map_order_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_by_quote(&self, quote_id: i64) -> Result<Option<ServiceOrder>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<ServiceOrder>> {
            let conn = db.get_connection()?;
            conn.query_row(ORDER_SELECT_BY_QUOTE, params![quote_id], map_order_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(&self, filter: &OrderFilter, page: u32) -> Result<Page<ServiceOrderSummary>> {
        let db = Arc::clone(&self.db);
        let pattern = filter.search.as_ref().map(|term| format!("%{term}%"));
        let status = filter.status.map(|s| s.to_string());

        task::spawn_blocking(move || -> Result<Page<ServiceOrderSummary>> {
            let conn = db.get_connection()?;
            let offset = list_offset(page, PAGE_SIZE);

            let total: u64 = conn
                .query_row(ORDER_COUNT_FILTERED, params![pattern, status], |row| row.get(0))
                .map_err(map_sql_error)?;

            let mut stmt = conn.prepare(ORDER_SELECT_PAGE).map_err(map_sql_error)?;
            let params: [&dyn ToSql; 4] = [&pattern, &status, &PAGE_SIZE, &offset];
            let rows = stmt
                .query_map(&params, map_order_summary_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            Ok(Page::new(rows, page, PAGE_SIZE, total))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn report_rows(&self, filter: &ServiceReportFilter) -> Result<Vec<ServiceOrderSummary>> {
        let db = Arc::clone(&self.db);
        let (from, until) = filter.opened_bounds();
        let client_id = filter.client_id;
        let status = filter.status.map(|s| s.to_string());

        task::spawn_blocking(move || -> Result<Vec<ServiceOrderSummary>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(ORDER_SELECT_REPORT).map_err(map_sql_error)?;
            let params: [&dyn ToSql; 4] = [&from, &until, &client_id, &status];
            let rows = stmt
                .query_map(&params, map_order_summary_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(rows)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count(&self) -> Result<u64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<u64> {
            let conn = db.get_connection()?;
            conn.query_row("SELECT COUNT(*) FROM service_orders", [], |row| row.get(0))
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count_by_status(&self, status: ServiceOrderStatus) -> Result<u64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<u64> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT COUNT(*) FROM service_orders WHERE status = ?1",
                params![status.to_string()],
                |row| row.get(0),
            )
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn revenue_since(&self, since: i64) -> Result<Decimal> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Decimal> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(ORDER_REVENUE_TOTALS).map_err(map_sql_error)?;
            let totals = stmt
                .query_map(
                    params![ServiceOrderStatus::Completed.to_string(), since],
                    |row| row.get::<_, String>(0),
                )
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            // Totals are decimal strings; summing happens here, not in SQL.
            let mut revenue = Decimal::ZERO;
            for total in totals {
                let value = Decimal::from_str(&total).map_err(|err| {
                    OficinaError::Database(format!("malformed quote total {total:?}: {err}"))
                })?;
                revenue += value;
            }
            Ok(revenue)
        })
        .await
        .map_err(map_join_error)?
    }
}

pub(crate) const ORDER_SELECT_BY_ID: &str = "SELECT
        id, number, quote_id, status, opened_at, started_at, completed_at, notes
    FROM service_orders
    WHERE id = ?1";

const ORDER_SELECT_BY_QUOTE: &str = "SELECT
        id, number, quote_id, status, opened_at, started_at, completed_at, notes
    FROM service_orders
    WHERE quote_id = ?1";

const ORDER_SELECT_PAGE: &str = "SELECT
        o.id, o.number, o.quote_id, o.status, o.opened_at, o.started_at, o.completed_at, o.notes,
        q.number, c.name, q.service_description, q.total_value
    FROM service_orders o
    JOIN quotes q ON q.id = o.quote_id
    JOIN clients c ON c.id = q.client_id
    WHERE (?1 IS NULL OR o.number LIKE ?1 OR q.number LIKE ?1 OR c.name LIKE ?1)
      AND (?2 IS NULL OR o.status = ?2)
    ORDER BY o.opened_at DESC, o.id DESC
    LIMIT ?3 OFFSET ?4";

const ORDER_COUNT_FILTERED: &str = "SELECT COUNT(*)
    FROM service_orders o
    JOIN quotes q ON q.id = o.quote_id
    JOIN clients c ON c.id = q.client_id
    WHERE (?1 IS NULL OR o.number LIKE ?1 OR q.number LIKE ?1 OR c.name LIKE ?1)
      AND (?2 IS NULL OR o.status = ?2)";

const ORDER_SELECT_REPORT: &str = "SELECT
        o.id, o.number, o.quote_id, o.status, o.opened_at, o.started_at, o.completed_at, o.notes,
        q.number, c.name, q.service_description, q.total_value
    FROM service_orders o
    JOIN quotes q ON q.id = o.quote_id
    JOIN clients c ON c.id = q.client_id
    WHERE (?1 IS NULL OR o.opened_at >= ?1)
      AND (?2 IS NULL OR o.opened_at <= ?2)
      AND (?3 IS NULL OR q.client_id = ?3)
      AND (?4 IS NULL OR o.status = ?4)
    ORDER BY o.opened_at DESC, o.id DESC";

const ORDER_REVENUE_TOTALS: &str = "SELECT q.total_value
    FROM service_orders o
    JOIN quotes q ON q.id = o.quote_id
    WHERE o.status = ?1 AND o.completed_at >= ?2";

pub(crate) fn map_order_row(row: &Row<'_>) -> rusqlite::Result<ServiceOrder> {
    Ok(ServiceOrder {
        id: row.get(0)?,
        number: row.get(1)?,
        quote_id: row.get(2)?,
        status: status_column(row, 3)?,
        opened_at: row.get(4)?,
        started_at: row.get(5)?,
        completed_at: row.get(6)?,
        notes: row.get(7)?,
    })
}

fn map_order_summary_row(row: &Row<'_>) -> rusqlite::Result<ServiceOrderSummary> {
    Ok(ServiceOrderSummary {
        order: map_order_row(row)?,
        quote_number: row.get(8)?,
        client_name: row.get(9)?,
        service_description: row.get(10)?,
        total_value: decimal_column(row, 11)?,
    })
}
