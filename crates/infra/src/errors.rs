//! Conversions from external infrastructure errors into domain errors.

use oficina_domain::OficinaError;
use rusqlite::Error as SqlError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub OficinaError);

impl From<InfraError> for OficinaError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<OficinaError> for InfraError {
    fn from(value: OficinaError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoOficinaError {
    fn into_oficina(self) -> OficinaError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → OficinaError */
/* -------------------------------------------------------------------------- */

impl IntoOficinaError for SqlError {
    fn into_oficina(self) -> OficinaError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        OficinaError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        OficinaError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_UNIQUE)
                    | (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_PRIMARYKEY) => {
                        OficinaError::Conflict("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_FOREIGNKEY) => {
                        OficinaError::Database("foreign key constraint violation".into())
                    }
                    _ => OficinaError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => OficinaError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                OficinaError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                OficinaError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => OficinaError::Database("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidParameterName(parameter_name) => {
                OficinaError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => {
                OficinaError::Database(format!("invalid database path: {}", path.to_string_lossy()))
            }
            RE::InvalidQuery => OficinaError::Database("invalid SQL query".into()),
            other => OficinaError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_oficina())
    }
}

const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;
const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;

/// Convert a rusqlite error into the domain error.
pub fn map_sql_error(err: SqlError) -> OficinaError {
    InfraError::from(err).into()
}

/// True when the error is a unique or primary key constraint violation.
///
/// The transactional stores use this to tell a document number collision
/// apart from other failures before retrying with a fresh sequence.
pub fn is_unique_violation(err: &SqlError) -> bool {
    matches!(
        err,
        SqlError::SqliteFailure(inner, _)
            if inner.extended_code == SQLITE_CONSTRAINT_UNIQUE
                || inner.extended_code == SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → OficinaError */
/* -------------------------------------------------------------------------- */

impl IntoOficinaError for r2d2::Error {
    fn into_oficina(self) -> OficinaError {
        OficinaError::Database(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_oficina())
    }
}

/* -------------------------------------------------------------------------- */
/* Blocking task helpers */
/* -------------------------------------------------------------------------- */

/// Map a failed `spawn_blocking` join into a domain error.
pub fn map_join_error(err: JoinError) -> OficinaError {
    if err.is_cancelled() {
        OficinaError::Internal("blocking database task cancelled".into())
    } else {
        OficinaError::Internal(format!("blocking database task failed: {err}"))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use rusqlite::ffi::{Error as FfiError, ErrorCode};
    use rusqlite::Error as SqlError;

    use super::*;

    #[test]
    fn sqlite_busy_maps_to_database_error() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseBusy, extended_code: 5 },
            Some("database is locked".into()),
        );

        let mapped: OficinaError = InfraError::from(err).into();
        match mapped {
            OficinaError::Database(msg) => {
                assert!(msg.contains("busy") || msg.contains("locked"));
            }
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::ConstraintViolation, extended_code: 2067 },
            Some("UNIQUE constraint failed: quotes.number".into()),
        );

        assert!(is_unique_violation(&err));

        let mapped: OficinaError = InfraError::from(err).into();
        match mapped {
            OficinaError::Conflict(msg) => assert!(msg.contains("unique")),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn foreign_key_violation_is_not_unique() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::ConstraintViolation, extended_code: 787 },
            Some("FOREIGN KEY constraint failed".into()),
        );

        assert!(!is_unique_violation(&err));

        let mapped: OficinaError = InfraError::from(err).into();
        match mapped {
            OficinaError::Database(msg) => assert!(msg.contains("foreign key")),
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let mapped: OficinaError = InfraError::from(SqlError::QueryReturnedNoRows).into();
        assert!(matches!(mapped, OficinaError::NotFound(_)));
    }
}
