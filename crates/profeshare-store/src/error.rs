//! Error types for the profeshare-store crate.
//!
//! All storage operations return [`StoreError`] via [`StoreResult`].

use thiserror::Error;

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite operation failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A schema migration failed.
    #[error("migration v{version} failed: {message}")]
    Migration { version: u32, message: String },

    /// The record a write targeted does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A unique key is already taken.
    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: &'static str, key: String },

    /// An invalid argument was provided to a store operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A blocking task was cancelled or panicked, or the connection mutex
    /// was poisoned.
    #[error("background task failed: {0}")]
    TaskJoin(String),
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskJoin(err.to_string())
    }
}

/// Map a UNIQUE or PRIMARY KEY violation to [`StoreError::AlreadyExists`],
/// passing every other error through. NOT NULL, CHECK and FOREIGN KEY
/// failures stay [`StoreError::Sqlite`].
pub(crate) fn unique_violation(
    err: rusqlite::Error,
    entity: &'static str,
    key: &str,
) -> StoreError {
    if let rusqlite::Error::SqliteFailure(ref failure, _) = err
        && matches!(
            failure.extended_code,
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        )
    {
        return StoreError::AlreadyExists {
            entity,
            key: key.to_owned(),
        };
    }
    StoreError::Sqlite(err)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;

    fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        conn.execute_batch(
            "CREATE TABLE parent (id TEXT PRIMARY KEY);
             CREATE TABLE child (
                 id        TEXT PRIMARY KEY,
                 email     TEXT NOT NULL UNIQUE,
                 parent_id TEXT REFERENCES parent(id),
                 age       INTEGER CHECK (age >= 0)
             );
             INSERT INTO parent (id) VALUES ('p');
             INSERT INTO child (id, email, parent_id, age) VALUES ('c1', 'a@example.com', 'p', 1);",
        )
        .unwrap();
        conn
    }

    fn insert(conn: &Connection, id: &str, email: Option<&str>, parent: &str, age: i64) -> StoreError {
        let err = conn
            .execute(
                "INSERT INTO child (id, email, parent_id, age) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, email, parent, age],
            )
            .unwrap_err();
        unique_violation(err, "child", id)
    }

    #[test]
    fn unique_and_primary_key_map_to_already_exists() {
        let conn = setup_conn();
        assert!(matches!(
            insert(&conn, "c2", Some("a@example.com"), "p", 1),
            StoreError::AlreadyExists { entity: "child", .. }
        ));
        assert!(matches!(
            insert(&conn, "c1", Some("b@example.com"), "p", 1),
            StoreError::AlreadyExists { .. }
        ));
    }

    #[test]
    fn other_constraints_pass_through() {
        let conn = setup_conn();
        for err in [
            insert(&conn, "c3", None, "p", 1),
            insert(&conn, "c4", Some("d@example.com"), "ghost", 1),
            insert(&conn, "c5", Some("e@example.com"), "p", -1),
        ] {
            match err {
                StoreError::Sqlite(_) => {}
                other => panic!("expected Sqlite, got: {other}"),
            }
        }
    }
}
