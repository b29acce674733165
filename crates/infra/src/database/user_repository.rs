//! SQLite-backed user repository.

use std::sync::Arc;

use async_trait::async_trait;
use oficina_core::UserRepository;
use oficina_domain::{NewUser, OficinaError, Result, User};
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;

use super::manager::DbManager;
use crate::errors::{map_join_error, map_sql_error};

pub struct SqliteUserRepository {
    db: Arc<DbManager>,
}

impl SqliteUserRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: NewUser, created_at: i64) -> Result<User> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<User> {
            let conn = db.get_connection()?;
            conn.execute(USER_INSERT, params![user.name, user.email, created_at])
                .map_err(map_sql_error)?;

            Ok(User {
                id: conn.last_insert_rowid(),
                name: user.name,
                email: user.email,
                active: true,
                created_at,
            })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<User>> {
            let conn = db.get_connection()?;
            conn.query_row(USER_SELECT_BY_ID, params![id], map_user_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let db = Arc::clone(&self.db);
        let email = email.to_string();

        task::spawn_blocking(move || -> Result<Option<User>> {
            let conn = db.get_connection()?;
            conn.query_row(USER_SELECT_BY_EMAIL, params![email], map_user_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(&self) -> Result<Vec<User>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<User>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(USER_SELECT_ALL).map_err(map_sql_error)?;
            let users = stmt
                .query_map([], map_user_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(users)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<User> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<User> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute("UPDATE users SET active = ?1 WHERE id = ?2", params![active, id])
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(OficinaError::NotFound(format!("user {id} not found")));
            }

            conn.query_row(USER_SELECT_BY_ID, params![id], map_user_row).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

const USER_INSERT: &str =
    "INSERT INTO users (name, email, created_at) VALUES (?1, ?2, ?3)";

const USER_SELECT_BY_ID: &str = "SELECT id, name, email, active, created_at
    FROM users
    WHERE id = ?1";

const USER_SELECT_BY_EMAIL: &str = "SELECT id, name, email, active, created_at
    FROM users
    WHERE email = ?1";

const USER_SELECT_ALL: &str = "SELECT id, name, email, active, created_at
    FROM users
    ORDER BY name COLLATE NOCASE ASC";

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        active: row.get::<_, i64>(3)? != 0,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn creates_user_as_active() {
        let (repo, _manager, _dir) = setup_repository().await;

        let created = repo.create(sample_user("mecanico@oficina.com"), 1_760_000_000).await.expect("created");
        assert!(created.active);

        let fetched =
            repo.get_by_email("mecanico@oficina.com").await.expect("fetched").expect("present");
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn duplicate_email_is_a_conflict() {
        let (repo, _manager, _dir) = setup_repository().await;

        repo.create(sample_user("mecanico@oficina.com"), 0).await.expect("first created");
        let err =
            repo.create(sample_user("mecanico@oficina.com"), 0).await.expect_err("dup rejected");
        assert!(matches!(err, OficinaError::Conflict(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn set_active_flips_flag() {
        let (repo, _manager, _dir) = setup_repository().await;

        let created = repo.create(sample_user("mecanico@oficina.com"), 0).await.unwrap();
        let deactivated = repo.set_active(created.id, false).await.expect("deactivated");
        assert!(!deactivated.active);

        let reactivated = repo.set_active(created.id, true).await.expect("reactivated");
        assert!(reactivated.active);
    }

    async fn setup_repository() -> (SqliteUserRepository, Arc<DbManager>, TempDir) {
        let temp_dir = TempDir::new().expect("temp dir created");
        let db_path = temp_dir.path().join("users.db");

        let manager = Arc::new(DbManager::new(&db_path, 4).expect("db manager created"));
        manager.run_migrations().expect("migrations run");

        let repo = SqliteUserRepository::new(manager.clone());
        (repo, manager, temp_dir)
    }

    fn sample_user(email: &str) -> NewUser {
        NewUser { name: "João Mecânico".to_string(), email: email.to_string() }
    }
}
