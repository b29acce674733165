//! SQLite-backed client repository.

use std::sync::Arc;

use async_trait::async_trait;
use oficina_core::ClientRepository;
use oficina_domain::constants::PAGE_SIZE;
use oficina_domain::{list_offset, Client, NewClient, OficinaError, Page, Result};
use rusqlite::{params, OptionalExtension, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use crate::errors::{map_join_error, map_sql_error};

pub struct SqliteClientRepository {
    db: Arc<DbManager>,
}

impl SqliteClientRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClientRepository for SqliteClientRepository {
    async fn create(&self, client: NewClient, created_at: i64) -> Result<Client> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Client> {
            let conn = db.get_connection()?;
            conn.execute(
                CLIENT_INSERT,
                params![
                    client.name,
                    client.tax_id,
                    client.phone,
                    client.email,
                    client.address,
                    client.city,
                    client.state,
                    client.postal_code,
                    created_at,
                ],
            )
            .map_err(map_sql_error)?;

            Ok(Client {
                id: conn.last_insert_rowid(),
                name: client.name,
                tax_id: client.tax_id,
                phone: client.phone,
                email: client.email,
                address: client.address,
                city: client.city,
                state: client.state,
                postal_code: client.postal_code,
                created_at,
            })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, id: i64, client: NewClient) -> Result<Client> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Client> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    CLIENT_UPDATE,
                    params![
                        client.name,
                        client.tax_id,
                        client.phone,
                        client.email,
                        client.address,
                        client.city,
                        client.state,
                        client.postal_code,
                        id,
                    ],
                )
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(OficinaError::NotFound(format!("client {id} not found")));
            }

            conn.query_row(CLIENT_SELECT_BY_ID, params![id], map_client_row)
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Client>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<Client>> {
            let conn = db.get_connection()?;
            conn.query_row(CLIENT_SELECT_BY_ID, params![id], map_client_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_by_tax_id(&self, tax_id: &str) -> Result<Option<Client>> {
        let db = Arc::clone(&self.db);
        let tax_id = tax_id.to_string();

        task::spawn_blocking(move || -> Result<Option<Client>> {
            let conn = db.get_connection()?;
            conn.query_row(CLIENT_SELECT_BY_TAX_ID, params![tax_id], map_client_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(&self, search: Option<&str>, page: u32) -> Result<Page<Client>> {
        let db = Arc::clone(&self.db);
        let pattern = search.map(|term| format!("%{term}%"));

        task::spawn_blocking(move || -> Result<Page<Client>> {
            let conn = db.get_connection()?;
            let offset = list_offset(page, PAGE_SIZE);

            let (total, rows) = match &pattern {
                Some(pattern) => {
                    let total: u64 = conn
                        .query_row(CLIENT_COUNT_FILTERED, params![pattern], |row| row.get(0))
                        .map_err(map_sql_error)?;
                    let params: [&dyn ToSql; 3] = [pattern, &PAGE_SIZE, &offset];
                    (total, query_clients(&conn, CLIENT_SELECT_FILTERED, &params)?)
                }
                None => {
                    let total: u64 = conn
                        .query_row(CLIENT_COUNT, [], |row| row.get(0))
                        .map_err(map_sql_error)?;
                    let params: [&dyn ToSql; 2] = [&PAGE_SIZE, &offset];
                    (total, query_clients(&conn, CLIENT_SELECT_PAGE, &params)?)
                }
            };

            Ok(Page::new(rows, page, PAGE_SIZE, total))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn quick_search(&self, term: &str, limit: u32) -> Result<Vec<Client>> {
        let db = Arc::clone(&self.db);
        let pattern = format!("%{term}%");

        task::spawn_blocking(move || -> Result<Vec<Client>> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 2] = [&pattern, &limit];
            query_clients(&conn, CLIENT_QUICK_SEARCH, &params)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn quote_count(&self, id: i64) -> Result<u64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<u64> {
            let conn = db.get_connection()?;
            conn.query_row("SELECT COUNT(*) FROM quotes WHERE client_id = ?1", params![id], |row| {
                row.get(0)
            })
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let deleted = conn
                .execute("DELETE FROM clients WHERE id = ?1", params![id])
                .map_err(map_sql_error)?;
            if deleted == 0 {
                return Err(OficinaError::NotFound(format!("client {id} not found")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count(&self) -> Result<u64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<u64> {
            let conn = db.get_connection()?;
            conn.query_row(CLIENT_COUNT, [], |row| row.get(0)).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

const CLIENT_INSERT: &str = "INSERT INTO clients (
        name, tax_id, phone, email, address, city, state, postal_code, created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

const CLIENT_UPDATE: &str = "UPDATE clients SET
        name = ?1, tax_id = ?2, phone = ?3, email = ?4,
        address = ?5, city = ?6, state = ?7, postal_code = ?8
    WHERE id = ?9";

const CLIENT_SELECT_BY_ID: &str = "SELECT
        id, name, tax_id, phone, email, address, city, state, postal_code, created_at
    FROM clients
    WHERE id = ?1";

const CLIENT_SELECT_BY_TAX_ID: &str = "SELECT
        id, name, tax_id, phone, email, address, city, state, postal_code, created_at
    FROM clients
    WHERE tax_id = ?1";

const CLIENT_SELECT_PAGE: &str = "SELECT
        id, name, tax_id, phone, email, address, city, state, postal_code, created_at
    FROM clients
    ORDER BY name COLLATE NOCASE ASC
    LIMIT ?1 OFFSET ?2";

const CLIENT_SELECT_FILTERED: &str = "SELECT
        id, name, tax_id, phone, email, address, city, state, postal_code, created_at
    FROM clients
    WHERE name LIKE ?1 OR tax_id LIKE ?1 OR email LIKE ?1 OR phone LIKE ?1
    ORDER BY name COLLATE NOCASE ASC
    LIMIT ?2 OFFSET ?3";

const CLIENT_QUICK_SEARCH: &str = "SELECT
        id, name, tax_id, phone, email, address, city, state, postal_code, created_at
    FROM clients
    WHERE name LIKE ?1 OR tax_id LIKE ?1
    ORDER BY name COLLATE NOCASE ASC
    LIMIT ?2";

const CLIENT_COUNT: &str = "SELECT COUNT(*) FROM clients";

const CLIENT_COUNT_FILTERED: &str = "SELECT COUNT(*) FROM clients
    WHERE name LIKE ?1 OR tax_id LIKE ?1 OR email LIKE ?1 OR phone LIKE ?1";

fn query_clients(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Vec<Client>> {
    let mut stmt = conn.prepare(sql).map_err(map_sql_error)?;
    let rows = stmt
        .query_map(params, map_client_row)
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sql_error)?;
    Ok(rows)
}

fn map_client_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        tax_id: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        address: row.get(5)?,
        city: row.get(6)?,
        state: row.get(7)?,
        postal_code: row.get(8)?,
        created_at: row.get(9)?,
    })
}
