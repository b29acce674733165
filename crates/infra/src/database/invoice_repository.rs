//! SQLite-backed invoice queries.

use std::sync::Arc;

use async_trait::async_trait;
use oficina_core::{InvoiceFilter, InvoiceRepository};
use oficina_domain::constants::PAGE_SIZE;
use oficina_domain::{list_offset, Invoice, InvoiceSummary, Page, Result};
use rusqlite::{params, OptionalExtension, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::row::{decimal_column, status_column};
use crate::errors::{map_join_error, map_sql_error};

pub struct SqliteInvoiceRepository {
    db: Arc<DbManager>,
}

impl SqliteInvoiceRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InvoiceRepository for SqliteInvoiceRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<Invoice>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<Invoice>> {
            let conn = db.get_connection()?;
            conn.query_row(INVOICE_SELECT_BY_ID, params![id], map_invoice_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_by_order(&self, order_id: i64) -> Result<Option<Invoice>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<Invoice>> {
            let conn = db.get_connection()?;
            conn.query_row(INVOICE_SELECT_BY_ORDER, params![order_id], map_invoice_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(&self, filter: &InvoiceFilter, page: u32) -> Result<Page<InvoiceSummary>> {
        let db = Arc::clone(&self.db);
        let pattern = filter.search.as_ref().map(|term| format!("%{term}%"));
        let status = filter.status.map(|s| s.to_string());

        task::spawn_blocking(move || -> Result<Page<InvoiceSummary>> {
            let conn = db.get_connection()?;
            let offset = list_offset(page, PAGE_SIZE);

            let total: u64 = conn
                .query_row(INVOICE_COUNT_FILTERED, params![pattern, status], |row| row.get(0))
                .map_err(map_sql_error)?;

            let mut stmt = conn.prepare(INVOICE_SELECT_PAGE).map_err(map_sql_error)?;
            let params: [&dyn ToSql; 4] = [&pattern, &status, &PAGE_SIZE, &offset];
            let rows = stmt
                .query_map(&params, map_invoice_summary_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            Ok(Page::new(rows, page, PAGE_SIZE, total))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count(&self) -> Result<u64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<u64> {
            let conn = db.get_connection()?;
            conn.query_row("SELECT COUNT(*) FROM invoices", [], |row| row.get(0))
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

pub(crate) const INVOICE_SELECT_BY_ID: &str = "SELECT
        id, number, order_id, total_value, status, issued_at
    FROM invoices
    WHERE id = ?1";

pub(crate) const INVOICE_SELECT_BY_ORDER: &str = "SELECT
        id, number, order_id, total_value, status, issued_at
    FROM invoices
    WHERE order_id = ?1";

const INVOICE_SELECT_PAGE: &str = "SELECT
        i.id, i.number, i.order_id, i.total_value, i.status, i.issued_at,
        o.number, c.name
    FROM invoices i
    JOIN service_orders o ON o.id = i.order_id
    JOIN quotes q ON q.id = o.quote_id
    JOIN clients c ON c.id = q.client_id
    WHERE (?1 IS NULL OR i.number LIKE ?1 OR o.number LIKE ?1 OR c.name LIKE ?1)
      AND (?2 IS NULL OR i.status = ?2)
    ORDER BY i.issued_at DESC, i.id DESC
    LIMIT ?3 OFFSET ?4";

const INVOICE_COUNT_FILTERED: &str = "SELECT COUNT(*)
    FROM invoices i
    JOIN service_orders o ON o.id = i.order_id
    JOIN quotes q ON q.id = o.quote_id
    JOIN clients c ON c.id = q.client_id
    WHERE (?1 IS NULL OR i.number LIKE ?1 OR o.number LIKE ?1 OR c.name LIKE ?1)
      AND (?2 IS NULL OR i.status = ?2)";

pub(crate) fn map_invoice_row(row: &Row<'_>) -> rusqlite::Result<Invoice> {
    Ok(Invoice {
        id: row.get(0)?,
        number: row.get(1)?,
        order_id: row.get(2)?,
        total_value: decimal_column(row, 3)?,
        status: status_column(row, 4)?,
        issued_at: row.get(5)?,
    })
}

fn map_invoice_summary_row(row: &Row<'_>) -> rusqlite::Result<InvoiceSummary> {
    Ok(InvoiceSummary {
        invoice: map_invoice_row(row)?,
        order_number: row.get(6)?,
        client_name: row.get(7)?,
    })
}
