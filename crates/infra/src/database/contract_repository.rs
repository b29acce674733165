//! SQLite-backed contract queries.

use std::sync::Arc;

use async_trait::async_trait;
use oficina_core::ContractRepository;
use oficina_domain::{Contract, Result};
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;

use super::manager::DbManager;
use super::row::status_column;
use crate::errors::{map_join_error, map_sql_error};

pub struct SqliteContractRepository {
    db: Arc<DbManager>,
}

impl SqliteContractRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContractRepository for SqliteContractRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<Contract>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<Contract>> {
            let conn = db.get_connection()?;
            conn.query_row(CONTRACT_SELECT_BY_ID, params![id], map_contract_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_by_order(&self, order_id: i64) -> Result<Option<Contract>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<Contract>> {
            let conn = db.get_connection()?;
            conn.query_row(CONTRACT_SELECT_BY_ORDER, params![order_id], map_contract_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

const CONTRACT_SELECT_BY_ID: &str = "SELECT
        id, number, order_id, terms, status, created_at
    FROM contracts
    WHERE id = ?1";

pub(crate) const CONTRACT_SELECT_BY_ORDER: &str = "SELECT
        id, number, order_id, terms, status, created_at
    FROM contracts
    WHERE order_id = ?1";

pub(crate) fn map_contract_row(row: &Row<'_>) -> rusqlite::Result<Contract> {
    Ok(Contract {
        id: row.get(0)?,
        number: row.get(1)?,
        order_id: row.get(2)?,
        terms: row.get(3)?,
        status: status_column(row, 4)?,
        created_at: row.get(5)?,
    })
}
