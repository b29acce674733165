//! SQLite connection pool helpers.
//!
//! Thin wrapper around an r2d2 pool that applies per-connection pragmas and
//! converts pool errors into the domain error type used by infrastructure
//! code.

use std::path::Path;
use std::time::Duration;

use oficina_domain::{OficinaError, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::warn;

pub type SqlitePool = Pool<SqliteConnectionManager>;
pub type SqliteConnection = PooledConnection<SqliteConnectionManager>;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a pooled SQLite handle for the given database file.
///
/// Every connection handed out by the pool has WAL mode, NORMAL synchronous
/// mode, foreign keys, and a busy timeout applied.
pub fn create_pool<P: AsRef<Path>>(path: P, pool_size: u32) -> Result<SqlitePool> {
    let manager =
        SqliteConnectionManager::file(path.as_ref()).with_init(apply_connection_pragmas);

    Pool::builder()
        .max_size(pool_size.max(1))
        .connection_timeout(CONNECTION_TIMEOUT)
        .build(manager)
        .map_err(|e| {
            warn!("failed to create connection pool: {e}");
            OficinaError::Database(format!("failed to create pool: {e}"))
        })
}

fn apply_connection_pragmas(conn: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;\n\
         PRAGMA wal_autocheckpoint=1000;\n\
         PRAGMA synchronous=NORMAL;\n\
         PRAGMA foreign_keys=ON;\n",
    )?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn create_pool_successfully() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let pool = create_pool(&db_path, 4).expect("pool should be created");

        // Smoke test: acquire a connection and create a table
        let conn = pool.get().expect("connection should be acquired");
        conn.execute("CREATE TABLE test (id INTEGER PRIMARY KEY)", rusqlite::params![])
            .expect("table creation should succeed");
    }

    #[test]
    fn connections_have_pragmas_applied() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let pool = create_pool(&db_path, 2).expect("pool should be created");
        let conn = pool.get().expect("connection should be acquired");

        let journal_mode: String =
            conn.pragma_query_value(None, "journal_mode", |row| row.get(0)).unwrap();
        assert_eq!(journal_mode.to_lowercase(), "wal");

        let foreign_keys: i32 =
            conn.pragma_query_value(None, "foreign_keys", |row| row.get(0)).unwrap();
        assert_eq!(foreign_keys, 1);

        let synchronous: i32 =
            conn.pragma_query_value(None, "synchronous", |row| row.get(0)).unwrap();
        assert_eq!(synchronous, 1); // 1 = NORMAL
    }
}
