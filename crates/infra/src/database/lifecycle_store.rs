//! Transactional lifecycle transitions.
//!
//! Each transition runs in one immediate transaction: the current status is
//! re-read and gated inside it, numbered rows are inserted inside it, and
//! everything rolls back together on failure. Transitions that assign
//! document numbers retry the whole transaction when the UNIQUE index on a
//! `number` column reports a collision with an external writer.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use oficina_core::{AcceptedQuote, CompletedOrder, LifecycleStore};
use oficina_domain::constants::NUMBER_RETRY_ATTEMPTS;
use oficina_domain::{
    Contract, ContractStatus, DocumentSeries, Invoice, InvoiceStatus, OficinaError, Quote,
    QuoteStatus, Result, ServiceOrder, ServiceOrderStatus,
};
use rusqlite::{params, OptionalExtension, Transaction, TransactionBehavior};
use tokio::task;
use tracing::debug;

use super::contract_repository::{map_contract_row, CONTRACT_SELECT_BY_ORDER};
use super::invoice_repository::{map_invoice_row, INVOICE_SELECT_BY_ID, INVOICE_SELECT_BY_ORDER};
use super::manager::DbManager;
use super::numbering::next_number;
use super::order_repository::{map_order_row, ORDER_SELECT_BY_ID};
use super::quote_repository::{map_quote_row, QUOTE_SELECT_BY_ID};
use crate::errors::{is_unique_violation, map_join_error, map_sql_error};

pub struct SqliteLifecycleStore {
    db: Arc<DbManager>,
}

impl SqliteLifecycleStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

/// Outcome of one transactional attempt.
enum StepError {
    /// A numbered insert hit the UNIQUE index; the caller may retry the
    /// whole transaction with a fresh scan.
    NumberTaken,
    Fail(OficinaError),
}

impl From<OficinaError> for StepError {
    fn from(err: OficinaError) -> Self {
        StepError::Fail(err)
    }
}

type StepResult<T> = std::result::Result<T, StepError>;

#[async_trait]
impl LifecycleStore for SqliteLifecycleStore {
    async fn accept_quote(
        &self,
        quote_id: i64,
        at: i64,
        order_note: String,
        terms: String,
    ) -> Result<AcceptedQuote> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<AcceptedQuote> {
            let mut conn = db.get_connection()?;
            for attempt in 1..=NUMBER_RETRY_ATTEMPTS {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(map_sql_error)?;
                match accept_quote_tx(&tx, quote_id, at, &order_note, &terms) {
                    Ok(accepted) => {
                        tx.commit().map_err(map_sql_error)?;
                        return Ok(accepted);
                    }
                    Err(StepError::NumberTaken) if attempt < NUMBER_RETRY_ATTEMPTS => {
                        debug!(quote_id, attempt, "document number taken, retrying accept");
                        drop(tx);
                    }
                    Err(StepError::NumberTaken) => break,
                    Err(StepError::Fail(err)) => return Err(err),
                }
            }
            Err(number_exhausted())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn reject_quote(&self, quote_id: i64) -> Result<Quote> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Quote> {
            let mut conn = db.get_connection()?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sql_error)?;

            let quote = require_quote(&tx, quote_id)?;
            if !quote.status.is_decidable() {
                return Err(OficinaError::InvalidTransition(format!(
                    "quote {} is {} and cannot be rejected",
                    quote.number, quote.status
                )));
            }

            tx.execute(
                "UPDATE quotes SET status = ?1 WHERE id = ?2",
                params![QuoteStatus::Rejected.to_string(), quote_id],
            )
            .map_err(map_sql_error)?;
            tx.commit().map_err(map_sql_error)?;

            Ok(Quote { status: QuoteStatus::Rejected, ..quote })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn start_order(&self, order_id: i64, at: i64) -> Result<ServiceOrder> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<ServiceOrder> {
            let mut conn = db.get_connection()?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sql_error)?;

            let order = require_order(&tx, order_id)?;
            if !order.status.can_start() {
                return Err(OficinaError::InvalidTransition(format!(
                    "order {} is {} and cannot be started",
                    order.number, order.status
                )));
            }

            tx.execute(
                "UPDATE service_orders SET status = ?1, started_at = ?2 WHERE id = ?3",
                params![ServiceOrderStatus::InProgress.to_string(), at, order_id],
            )
            .map_err(map_sql_error)?;
            tx.commit().map_err(map_sql_error)?;

            Ok(ServiceOrder {
                status: ServiceOrderStatus::InProgress,
                started_at: Some(at),
                ..order
            })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn complete_order(
        &self,
        order_id: i64,
        at: i64,
        note: Option<String>,
    ) -> Result<CompletedOrder> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<CompletedOrder> {
            let mut conn = db.get_connection()?;
            for attempt in 1..=NUMBER_RETRY_ATTEMPTS {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(map_sql_error)?;
                match complete_order_tx(&tx, order_id, at, note.as_deref()) {
                    Ok(completed) => {
                        tx.commit().map_err(map_sql_error)?;
                        return Ok(completed);
                    }
                    Err(StepError::NumberTaken) if attempt < NUMBER_RETRY_ATTEMPTS => {
                        debug!(order_id, attempt, "invoice number taken, retrying completion");
                        drop(tx);
                    }
                    Err(StepError::NumberTaken) => break,
                    Err(StepError::Fail(err)) => return Err(err),
                }
            }
            Err(number_exhausted())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn cancel_order(&self, order_id: i64, note: Option<String>) -> Result<ServiceOrder> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<ServiceOrder> {
            let mut conn = db.get_connection()?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sql_error)?;

            let order = require_order(&tx, order_id)?;
            if !order.status.can_cancel() {
                return Err(OficinaError::InvalidTransition(format!(
                    "order {} is {} and cannot be canceled",
                    order.number, order.status
                )));
            }

            let notes = append_note(order.notes.clone(), note.as_deref());
            tx.execute(
                "UPDATE service_orders SET status = ?1, notes = ?2 WHERE id = ?3",
                params![ServiceOrderStatus::Canceled.to_string(), notes, order_id],
            )
            .map_err(map_sql_error)?;

            let contract = tx
                .query_row(CONTRACT_SELECT_BY_ORDER, params![order_id], map_contract_row)
                .optional()
                .map_err(map_sql_error)?;
            if let Some(contract) = contract {
                tx.execute(
                    "UPDATE contracts SET status = ?1 WHERE id = ?2",
                    params![ContractStatus::Canceled.to_string(), contract.id],
                )
                .map_err(map_sql_error)?;
            }
            tx.commit().map_err(map_sql_error)?;

            Ok(ServiceOrder { status: ServiceOrderStatus::Canceled, notes, ..order })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn cancel_invoice(&self, invoice_id: i64) -> Result<Invoice> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Invoice> {
            let mut conn = db.get_connection()?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sql_error)?;

            let invoice = tx
                .query_row(INVOICE_SELECT_BY_ID, params![invoice_id], map_invoice_row)
                .optional()
                .map_err(map_sql_error)?
                .ok_or_else(|| OficinaError::NotFound(format!("invoice {invoice_id} not found")))?;
            if !invoice.status.can_cancel() {
                return Err(OficinaError::InvalidTransition(format!(
                    "invoice {} is {} and cannot be canceled",
                    invoice.number, invoice.status
                )));
            }

            tx.execute(
                "UPDATE invoices SET status = ?1 WHERE id = ?2",
                params![InvoiceStatus::Canceled.to_string(), invoice_id],
            )
            .map_err(map_sql_error)?;
            tx.commit().map_err(map_sql_error)?;

            Ok(Invoice { status: InvoiceStatus::Canceled, ..invoice })
        })
        .await
        .map_err(map_join_error)?
    }
}

const ORDER_INSERT: &str = "INSERT INTO service_orders (
        number, quote_id, status, opened_at, notes
    ) VALUES (?1, ?2, ?3, ?4, ?5)";

const CONTRACT_INSERT: &str = "INSERT INTO contracts (
        number, order_id, terms, status, created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5)";

const INVOICE_INSERT: &str = "INSERT INTO invoices (
        number, order_id, total_value, status, issued_at
    ) VALUES (?1, ?2, ?3, ?4, ?5)";

fn accept_quote_tx(
    tx: &Transaction<'_>,
    quote_id: i64,
    at: i64,
    order_note: &str,
    terms: &str,
) -> StepResult<AcceptedQuote> {
    let at_utc = timestamp_utc(at)?;
    let quote = require_quote(tx, quote_id)?;
    if !quote.status.is_decidable() {
        return Err(StepError::Fail(OficinaError::InvalidTransition(format!(
            "quote {} is {} and cannot be accepted",
            quote.number, quote.status
        ))));
    }

    tx.execute(
        "UPDATE quotes SET status = ?1 WHERE id = ?2",
        params![QuoteStatus::Accepted.to_string(), quote_id],
    )
    .map_err(map_sql_error)
    .map_err(StepError::Fail)?;

    let order_number = next_number(tx, DocumentSeries::ServiceOrder, at_utc)?;
    guard_number(tx.execute(
        ORDER_INSERT,
        params![
            order_number,
            quote_id,
            ServiceOrderStatus::Created.to_string(),
            at,
            order_note,
        ],
    ))?;
    let order_id = tx.last_insert_rowid();

    let contract_number = next_number(tx, DocumentSeries::Contract, at_utc)?;
    guard_number(tx.execute(
        CONTRACT_INSERT,
        params![contract_number, order_id, terms, ContractStatus::Active.to_string(), at],
    ))?;
    let contract_id = tx.last_insert_rowid();

    Ok(AcceptedQuote {
        quote: Quote { status: QuoteStatus::Accepted, ..quote },
        order: ServiceOrder {
            id: order_id,
            number: order_number,
            quote_id,
            status: ServiceOrderStatus::Created,
            opened_at: at,
            started_at: None,
            completed_at: None,
            notes: Some(order_note.to_string()),
        },
        contract: Contract {
            id: contract_id,
            number: contract_number,
            order_id,
            terms: terms.to_string(),
            status: ContractStatus::Active,
            created_at: at,
        },
    })
}

fn complete_order_tx(
    tx: &Transaction<'_>,
    order_id: i64,
    at: i64,
    note: Option<&str>,
) -> StepResult<CompletedOrder> {
    let at_utc = timestamp_utc(at)?;
    let order = require_order(tx, order_id)?;
    if !order.status.can_complete() {
        return Err(StepError::Fail(OficinaError::InvalidTransition(format!(
            "order {} is {} and cannot be completed",
            order.number, order.status
        ))));
    }

    let notes = append_note(order.notes.clone(), note);
    tx.execute(
        "UPDATE service_orders SET status = ?1, completed_at = ?2, notes = ?3 WHERE id = ?4",
        params![ServiceOrderStatus::Completed.to_string(), at, notes, order_id],
    )
    .map_err(map_sql_error)
    .map_err(StepError::Fail)?;

    let completed =
        ServiceOrder { status: ServiceOrderStatus::Completed, completed_at: Some(at), notes, ..order };

    // An invoice may already exist from an earlier completion attempt.
    let existing = tx
        .query_row(INVOICE_SELECT_BY_ORDER, params![order_id], map_invoice_row)
        .optional()
        .map_err(map_sql_error)
        .map_err(StepError::Fail)?;
    if let Some(invoice) = existing {
        return Ok(CompletedOrder { order: completed, invoice });
    }

    let total_value: String = tx
        .query_row(
            "SELECT total_value FROM quotes WHERE id = ?1",
            params![completed.quote_id],
            |row| row.get(0),
        )
        .map_err(map_sql_error)
        .map_err(StepError::Fail)?;

    let invoice_number = next_number(tx, DocumentSeries::Invoice, at_utc)?;
    guard_number(tx.execute(
        INVOICE_INSERT,
        params![invoice_number, order_id, total_value, InvoiceStatus::Issued.to_string(), at],
    ))?;
    let invoice_id = tx.last_insert_rowid();

    let invoice = tx
        .query_row(INVOICE_SELECT_BY_ID, params![invoice_id], map_invoice_row)
        .map_err(map_sql_error)
        .map_err(StepError::Fail)?;

    Ok(CompletedOrder { order: completed, invoice })
}

fn require_quote(tx: &Transaction<'_>, quote_id: i64) -> Result<Quote> {
    tx.query_row(QUOTE_SELECT_BY_ID, params![quote_id], map_quote_row)
        .optional()
        .map_err(map_sql_error)?
        .ok_or_else(|| OficinaError::NotFound(format!("quote {quote_id} not found")))
}

fn require_order(tx: &Transaction<'_>, order_id: i64) -> Result<ServiceOrder> {
    tx.query_row(ORDER_SELECT_BY_ID, params![order_id], map_order_row)
        .optional()
        .map_err(map_sql_error)?
        .ok_or_else(|| OficinaError::NotFound(format!("order {order_id} not found")))
}

fn guard_number(result: rusqlite::Result<usize>) -> StepResult<()> {
    match result {
        Ok(_) => Ok(()),
        Err(err) if is_unique_violation(&err) => Err(StepError::NumberTaken),
        Err(err) => Err(StepError::Fail(map_sql_error(err))),
    }
}

fn timestamp_utc(at: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(at, 0)
        .ok_or_else(|| OficinaError::Internal(format!("invalid transition timestamp {at}")))
}

/// Append `note` verbatim to the existing order notes.
fn append_note(existing: Option<String>, note: Option<&str>) -> Option<String> {
    match (existing, note) {
        (existing, None) => existing,
        (Some(mut existing), Some(note)) => {
            existing.push_str(note);
            Some(existing)
        }
        (None, Some(note)) => Some(note.to_string()),
    }
}

fn number_exhausted() -> OficinaError {
    OficinaError::Conflict("could not assign a unique document number".to_string())
}
