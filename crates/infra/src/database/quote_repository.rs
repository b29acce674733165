//! SQLite-backed quote repository.
//!
//! Quote creation assigns the document number and writes header plus line
//! items in one immediate transaction. A concurrent writer can still take
//! the scanned number first; the UNIQUE index surfaces that as a constraint
//! violation and the whole transaction is retried with a fresh scan.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use oficina_core::{NewQuoteRecord, QuoteFilter, QuoteRepository, QuoteUpdate};
use oficina_domain::constants::{NUMBER_RETRY_ATTEMPTS, PAGE_SIZE};
use oficina_domain::{
    list_offset, DocumentSeries, OficinaError, Page, Quote, QuoteItemDraft, QuoteLineItem,
    QuoteStatus, QuoteSummary, Result,
};
use rusqlite::{params, OptionalExtension, Row, ToSql, Transaction, TransactionBehavior};
use tokio::task;

use super::manager::DbManager;
use super::numbering::next_number;
use super::row::{date_column, decimal_column, status_column, DATE_FORMAT};
use crate::errors::{is_unique_violation, map_join_error, map_sql_error};

pub struct SqliteQuoteRepository {
    db: Arc<DbManager>,
}

impl SqliteQuoteRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QuoteRepository for SqliteQuoteRepository {
    async fn create(&self, record: NewQuoteRecord) -> Result<Quote> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Quote> {
            let mut conn = db.get_connection()?;
            let issued = DateTime::from_timestamp(record.issued_at, 0).ok_or_else(|| {
                OficinaError::Internal(format!("invalid issue timestamp {}", record.issued_at))
            })?;
            let valid_until = record.valid_until.format(DATE_FORMAT).to_string();

            for attempt in 1..=NUMBER_RETRY_ATTEMPTS {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(map_sql_error)?;
                let number = next_number(&tx, DocumentSeries::Quote, issued)?;

                let inserted = tx.execute(
                    QUOTE_INSERT,
                    params![
                        number,
                        record.client_id,
                        record.user_id,
                        record.service_description,
                        record.labor_value.to_string(),
                        record.total_value.to_string(),
                        QuoteStatus::Pending.to_string(),
                        record.issued_at,
                        valid_until,
                        record.notes,
                    ],
                );
                match inserted {
                    Ok(_) => {
                        let quote_id = tx.last_insert_rowid();
                        insert_quote_items(&tx, quote_id, &record.items)?;
                        tx.commit().map_err(map_sql_error)?;

                        return Ok(Quote {
                            id: quote_id,
                            number,
                            client_id: record.client_id,
                            user_id: record.user_id,
                            service_description: record.service_description,
                            labor_value: record.labor_value,
                            total_value: record.total_value,
                            status: QuoteStatus::Pending,
                            issued_at: record.issued_at,
                            valid_until: record.valid_until,
                            notes: record.notes,
                        });
                    }
                    Err(err) if is_unique_violation(&err) && attempt < NUMBER_RETRY_ATTEMPTS => {
                        // Lost the number race; roll back and rescan.
                        drop(tx);
                    }
                    Err(err) => return Err(map_sql_error(err)),
                }
            }

            Err(OficinaError::Conflict("could not assign a unique quote number".to_string()))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, id: i64, update: QuoteUpdate) -> Result<Quote> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Quote> {
            let mut conn = db.get_connection()?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sql_error)?;

            let current = tx
                .query_row(QUOTE_SELECT_BY_ID, params![id], map_quote_row)
                .optional()
                .map_err(map_sql_error)?
                .ok_or_else(|| OficinaError::NotFound(format!("quote {id} not found")))?;
            if !current.status.is_editable() {
                return Err(OficinaError::InvalidTransition(format!(
                    "quote {} is {} and can no longer be edited",
                    current.number, current.status
                )));
            }

            tx.execute(
                QUOTE_UPDATE,
                params![
                    update.service_description,
                    update.labor_value.to_string(),
                    update.total_value.to_string(),
                    update.valid_until.format(DATE_FORMAT).to_string(),
                    update.notes,
                    id,
                ],
            )
            .map_err(map_sql_error)?;
            tx.execute("DELETE FROM quote_items WHERE quote_id = ?1", params![id])
                .map_err(map_sql_error)?;
            insert_quote_items(&tx, id, &update.items)?;
            tx.commit().map_err(map_sql_error)?;

            Ok(Quote {
                service_description: update.service_description,
                labor_value: update.labor_value,
                total_value: update.total_value,
                valid_until: update.valid_until,
                notes: update.notes,
                ..current
            })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Quote>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<Quote>> {
            let conn = db.get_connection()?;
            conn.query_row(QUOTE_SELECT_BY_ID, params![id], map_quote_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn items(&self, quote_id: i64) -> Result<Vec<QuoteLineItem>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<QuoteLineItem>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(QUOTE_ITEM_SELECT).map_err(map_sql_error)?;
            let items = stmt
                .query_map(params![quote_id], map_quote_item_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(items)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(&self, filter: &QuoteFilter, page: u32) -> Result<Page<QuoteSummary>> {
        let db = Arc::clone(&self.db);
        let pattern = filter.search.as_ref().map(|term| format!("%{term}%"));
        let status = filter.status.map(|s| s.to_string());

        task::spawn_blocking(move || -> Result<Page<QuoteSummary>> {
            let conn = db.get_connection()?;
            let offset = list_offset(page, PAGE_SIZE);

            let total: u64 = conn
                .query_row(QUOTE_COUNT_FILTERED, params![pattern, status], |row| row.get(0))
                .map_err(map_sql_error)?;

            let mut stmt = conn.prepare(QUOTE_SELECT_PAGE).map_err(map_sql_error)?;
            let params: [&dyn ToSql; 4] = [&pattern, &status, &PAGE_SIZE, &offset];
            let rows = stmt
                .query_map(&params, map_quote_summary_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            Ok(Page::new(rows, page, PAGE_SIZE, total))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let mut conn = db.get_connection()?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sql_error)?;

            let current = tx
                .query_row(QUOTE_SELECT_BY_ID, params![id], map_quote_row)
                .optional()
                .map_err(map_sql_error)?
                .ok_or_else(|| OficinaError::NotFound(format!("quote {id} not found")))?;
            if !current.status.is_deletable() {
                return Err(OficinaError::InvalidTransition(format!(
                    "quote {} is {} and cannot be deleted",
                    current.number, current.status
                )));
            }

            tx.execute("DELETE FROM quote_items WHERE quote_id = ?1", params![id])
                .map_err(map_sql_error)?;
            tx.execute("DELETE FROM quotes WHERE id = ?1", params![id]).map_err(map_sql_error)?;
            tx.commit().map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count(&self) -> Result<u64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<u64> {
            let conn = db.get_connection()?;
            conn.query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count_by_status(&self, status: QuoteStatus) -> Result<u64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<u64> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT COUNT(*) FROM quotes WHERE status = ?1",
                params![status.to_string()],
                |row| row.get(0),
            )
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn recent(&self, limit: u32) -> Result<Vec<QuoteSummary>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<QuoteSummary>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(QUOTE_SELECT_RECENT).map_err(map_sql_error)?;
            let rows = stmt
                .query_map(params![limit], map_quote_summary_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(rows)
        })
        .await
        .map_err(map_join_error)?
    }
}

const QUOTE_INSERT: &str = "INSERT INTO quotes (
        number, client_id, user_id, service_description, labor_value, total_value,
        status, issued_at, valid_until, notes
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

const QUOTE_UPDATE: &str = "UPDATE quotes SET
        service_description = ?1, labor_value = ?2, total_value = ?3,
        valid_until = ?4, notes = ?5
    WHERE id = ?6";

const QUOTE_ITEM_INSERT: &str = "INSERT INTO quote_items (
        quote_id, material_id, quantity, unit_price, subtotal
    ) VALUES (?1, ?2, ?3, ?4, ?5)";

pub(crate) const QUOTE_SELECT_BY_ID: &str = "SELECT
        id, number, client_id, user_id, service_description, labor_value, total_value,
        status, issued_at, valid_until, notes
    FROM quotes
    WHERE id = ?1";

const QUOTE_ITEM_SELECT: &str = "SELECT
        id, quote_id, material_id, quantity, unit_price, subtotal
    FROM quote_items
    WHERE quote_id = ?1
    ORDER BY id ASC";

const QUOTE_SELECT_PAGE: &str = "SELECT
        q.id, q.number, q.client_id, q.user_id, q.service_description, q.labor_value,
        q.total_value, q.status, q.issued_at, q.valid_until, q.notes, c.name
    FROM quotes q
    JOIN clients c ON c.id = q.client_id
    WHERE (?1 IS NULL OR q.number LIKE ?1 OR c.name LIKE ?1 OR q.service_description LIKE ?1)
      AND (?2 IS NULL OR q.status = ?2)
    ORDER BY q.issued_at DESC, q.id DESC
    LIMIT ?3 OFFSET ?4";

const QUOTE_COUNT_FILTERED: &str = "SELECT COUNT(*)
    FROM quotes q
    JOIN clients c ON c.id = q.client_id
    WHERE (?1 IS NULL OR q.number LIKE ?1 OR c.name LIKE ?1 OR q.service_description LIKE ?1)
      AND (?2 IS NULL OR q.status = ?2)";

const QUOTE_SELECT_RECENT: &str = "SELECT
        q.id, q.number, q.client_id, q.user_id, q.service_description, q.labor_value,
        q.total_value, q.status, q.issued_at, q.valid_until, q.notes, c.name
    FROM quotes q
    JOIN clients c ON c.id = q.client_id
    ORDER BY q.issued_at DESC, q.id DESC
    LIMIT ?1";

fn insert_quote_items(tx: &Transaction<'_>, quote_id: i64, items: &[QuoteItemDraft]) -> Result<()> {
    for item in items {
        tx.execute(
            QUOTE_ITEM_INSERT,
            params![
                quote_id,
                item.material_id,
                item.quantity.to_string(),
                item.unit_price.to_string(),
                item.subtotal.to_string(),
            ],
        )
        .map_err(map_sql_error)?;
    }
    Ok(())
}

pub(crate) fn map_quote_row(row: &Row<'_>) -> rusqlite::Result<Quote> {
    Ok(Quote {
        id: row.get(0)?,
        number: row.get(1)?,
        client_id: row.get(2)?,
        user_id: row.get(3)?,
        service_description: row.get(4)?,
        labor_value: decimal_column(row, 5)?,
        total_value: decimal_column(row, 6)?,
        status: status_column(row, 7)?,
        issued_at: row.get(8)?,
        valid_until: date_column(row, 9)?,
        notes: row.get(10)?,
    })
}

fn map_quote_summary_row(row: &Row<'_>) -> rusqlite::Result<QuoteSummary> {
    Ok(QuoteSummary { quote: map_quote_row(row)?, client_name: row.get(11)? })
}

fn map_quote_item_row(row: &Row<'_>) -> rusqlite::Result<QuoteLineItem> {
    Ok(QuoteLineItem {
        id: row.get(0)?,
        quote_id: row.get(1)?,
        material_id: row.get(2)?,
        quantity: decimal_column(row, 3)?,
        unit_price: decimal_column(row, 4)?,
        subtotal: decimal_column(row, 5)?,
    })
}
