//! Database connection manager backed by the shared SQLite pool.

use std::path::{Path, PathBuf};

use oficina_domain::{OficinaError, Result};
use tracing::info;

use super::pool::{create_pool, SqliteConnection, SqlitePool};
use crate::errors::{map_sql_error, InfraError};

const SCHEMA_REVISION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Owns the r2d2 SQLite pool and the schema lifecycle.
pub struct DbManager {
    pool: SqlitePool,
    path: PathBuf,
}

impl DbManager {
    /// Open (or create) the database file and size the pool.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();
        let pool = create_pool(&path, pool_size)?;

        info!(
            db_path = %path.display(),
            max_connections = pool.max_size(),
            "sqlite pool initialised"
        );

        Ok(Self { pool, path })
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<SqliteConnection> {
        self.pool.get().map_err(|e| OficinaError::from(InfraError::from(e)))
    }

    /// Apply the schema and record its revision. Safe to run on every start;
    /// all statements are IF NOT EXISTS / OR IGNORE.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at) \
             VALUES (?1, CAST(strftime('%s','now') AS INTEGER))",
            [SCHEMA_REVISION],
        )
        .map_err(map_sql_error)?;
        Ok(())
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Round-trip one trivial query to prove the pool still hands out
    /// working connections.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0)).map_err(map_sql_error)?;
        Ok(())
    }
}
