//! SQLite-backed material repository.

use std::sync::Arc;

use async_trait::async_trait;
use oficina_core::MaterialRepository;
use oficina_domain::constants::{DEFAULT_MATERIAL_UNIT, PAGE_SIZE};
use oficina_domain::{list_offset, Material, NewMaterial, OficinaError, Page, Result};
use rusqlite::{params, OptionalExtension, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::row::decimal_column;
use crate::errors::{map_join_error, map_sql_error};

pub struct SqliteMaterialRepository {
    db: Arc<DbManager>,
}

impl SqliteMaterialRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MaterialRepository for SqliteMaterialRepository {
    async fn create(&self, material: NewMaterial, created_at: i64) -> Result<Material> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Material> {
            let conn = db.get_connection()?;
            let unit =
                material.unit.unwrap_or_else(|| DEFAULT_MATERIAL_UNIT.to_string());
            conn.execute(
                MATERIAL_INSERT,
                params![
                    material.name,
                    material.description,
                    material.code,
                    material.unit_price.to_string(),
                    material.stock_qty,
                    material.min_stock_qty,
                    unit,
                    created_at,
                ],
            )
            .map_err(map_sql_error)?;

            Ok(Material {
                id: conn.last_insert_rowid(),
                name: material.name,
                description: material.description,
                code: material.code,
                unit_price: material.unit_price,
                stock_qty: material.stock_qty,
                min_stock_qty: material.min_stock_qty,
                unit,
                created_at,
            })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, id: i64, material: NewMaterial) -> Result<Material> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Material> {
            let conn = db.get_connection()?;
            let unit =
                material.unit.unwrap_or_else(|| DEFAULT_MATERIAL_UNIT.to_string());
            let changed = conn
                .execute(
                    MATERIAL_UPDATE,
                    params![
                        material.name,
                        material.description,
                        material.code,
                        material.unit_price.to_string(),
                        material.stock_qty,
                        material.min_stock_qty,
                        unit,
                        id,
                    ],
                )
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(OficinaError::NotFound(format!("material {id} not found")));
            }

            conn.query_row(MATERIAL_SELECT_BY_ID, params![id], map_material_row)
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Material>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<Material>> {
            let conn = db.get_connection()?;
            conn.query_row(MATERIAL_SELECT_BY_ID, params![id], map_material_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<Material>> {
        let db = Arc::clone(&self.db);
        let code = code.to_string();

        task::spawn_blocking(move || -> Result<Option<Material>> {
            let conn = db.get_connection()?;
            conn.query_row(MATERIAL_SELECT_BY_CODE, params![code], map_material_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(&self, search: Option<&str>, page: u32) -> Result<Page<Material>> {
        let db = Arc::clone(&self.db);
        let pattern = search.map(|term| format!("%{term}%"));

        task::spawn_blocking(move || -> Result<Page<Material>> {
            let conn = db.get_connection()?;
            let offset = list_offset(page, PAGE_SIZE);

            let (total, rows) = match &pattern {
                Some(pattern) => {
                    let total: u64 = conn
                        .query_row(MATERIAL_COUNT_FILTERED, params![pattern], |row| row.get(0))
                        .map_err(map_sql_error)?;
                    let params: [&dyn ToSql; 3] = [pattern, &PAGE_SIZE, &offset];
                    (total, query_materials(&conn, MATERIAL_SELECT_FILTERED, &params)?)
                }
                None => {
                    let total: u64 = conn
                        .query_row(MATERIAL_COUNT, [], |row| row.get(0))
                        .map_err(map_sql_error)?;
                    let params: [&dyn ToSql; 2] = [&PAGE_SIZE, &offset];
                    (total, query_materials(&conn, MATERIAL_SELECT_PAGE, &params)?)
                }
            };

            Ok(Page::new(rows, page, PAGE_SIZE, total))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn quick_search(&self, term: &str, limit: u32) -> Result<Vec<Material>> {
        let db = Arc::clone(&self.db);
        let pattern = format!("%{term}%");

        task::spawn_blocking(move || -> Result<Vec<Material>> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 2] = [&pattern, &limit];
            query_materials(&conn, MATERIAL_QUICK_SEARCH, &params)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn usage_count(&self, id: i64) -> Result<u64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<u64> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT COUNT(*) FROM quote_items WHERE material_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn set_stock(&self, id: i64, stock_qty: i64) -> Result<Material> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Material> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE materials SET stock_qty = ?1 WHERE id = ?2",
                    params![stock_qty, id],
                )
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(OficinaError::NotFound(format!("material {id} not found")));
            }

            conn.query_row(MATERIAL_SELECT_BY_ID, params![id], map_material_row)
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
                .execute("DELETE FROM materials WHERE id = ?1", params![id])
                .map_err(map_sql_error)?;
            if deleted == 0 {
                return Err(OficinaError::NotFound(format!("material {id} not found")));
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
            conn.query_row(MATERIAL_COUNT, [], |row| row.get(0)).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn low_stock_count(&self) -> Result<u64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<u64> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT COUNT(*) FROM materials WHERE stock_qty <= min_stock_qty",
                [],
                |row| row.get(0),
            )
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

const MATERIAL_INSERT: &str = "INSERT INTO materials (
        name, description, code, unit_price, stock_qty, min_stock_qty, unit, created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

const MATERIAL_UPDATE: &str = "UPDATE materials SET
        name = ?1, description = ?2, code = ?3, unit_price = ?4,
        stock_qty = ?5, min_stock_qty = ?6, unit = ?7
    WHERE id = ?8";

const MATERIAL_SELECT_BY_ID: &str = "SELECT
        id, name, description, code, unit_price, stock_qty, min_stock_qty, unit, created_at
    FROM materials
    WHERE id = ?1";

const MATERIAL_SELECT_BY_CODE: &str = "SELECT
        id, name, description, code, unit_price, stock_qty, min_stock_qty, unit, created_at
    FROM materials
    WHERE code = ?1";

const MATERIAL_SELECT_PAGE: &str = "SELECT
        id, name, description, code, unit_price, stock_qty, min_stock_qty, unit, created_at
    FROM materials
    ORDER BY name COLLATE NOCASE ASC
    LIMIT ?1 OFFSET ?2";

const MATERIAL_SELECT_FILTERED: &str = "SELECT
        id, name, description, code, unit_price, stock_qty, min_stock_qty, unit, created_at
    FROM materials
    WHERE name LIKE ?1 OR code LIKE ?1 OR description LIKE ?1
    ORDER BY name COLLATE NOCASE ASC
    LIMIT ?2 OFFSET ?3";

const MATERIAL_QUICK_SEARCH: &str = "SELECT
        id, name, description, code, unit_price, stock_qty, min_stock_qty, unit, created_at
    FROM materials
    WHERE name LIKE ?1 OR code LIKE ?1
    ORDER BY name COLLATE NOCASE ASC
    LIMIT ?2";

const MATERIAL_COUNT: &str = "SELECT COUNT(*) FROM materials";

const MATERIAL_COUNT_FILTERED: &str = "SELECT COUNT(*) FROM materials
    WHERE name LIKE ?1 OR code LIKE ?1 OR description LIKE ?1";

fn query_materials(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Vec<Material>> {
    let mut stmt = conn.prepare(sql).map_err(map_sql_error)?;
    let rows = stmt
        .query_map(params, map_material_row)
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sql_error)?;
    Ok(rows)
}

fn map_material_row(row: &Row<'_>) -> rusqlite::Result<Material> {
    Ok(Material {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        code: row.get(3)?,
        unit_price: decimal_column(row, 4)?,
        stock_qty: row.get(5)?,
        min_stock_qty: row.get(6)?,
        unit: row.get(7)?,
        created_at: row.get(8)?,
    })
}
