//! Versioned schema migrations.
//!
//! Each migration is a static SQL batch with a version number. Applied
//! versions are recorded in `_migrations`, so running the set twice is a
//! no-op.

use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

struct Migration {
    version: u32,
    description: &'static str,
    sql: &'static str,
}

/// Append new migrations at the end; never edit an applied one.
static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "accounts and student profiles",
        sql: r#"
            CREATE TABLE accounts (
                id            TEXT PRIMARY KEY,
                email         TEXT NOT NULL UNIQUE,
                student_id    TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at    INTEGER NOT NULL
            );
            CREATE INDEX idx_accounts_student ON accounts(student_id);

            CREATE TABLE student_profiles (
                id                          TEXT PRIMARY KEY,
                student_id                  TEXT NOT NULL UNIQUE,
                first_name                  TEXT NOT NULL,
                last_name                   TEXT NOT NULL,
                email                       TEXT NOT NULL,
                skills                      TEXT,
                projects                    TEXT,
                experience                  TEXT,
                certifications_and_licenses TEXT,
                job_preferences             TEXT,
                profile_image               TEXT,
                created_at                  INTEGER NOT NULL,
                updated_at                  INTEGER NOT NULL
            );
            CREATE INDEX idx_profiles_email ON student_profiles(email);
        "#,
    },
    Migration {
        version: 2,
        description: "sign-in sessions",
        sql: r#"
            CREATE TABLE sessions (
                token      TEXT PRIMARY KEY,
                account_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
                created_at INTEGER NOT NULL
            );
        "#,
    },
];

/// Apply every migration newer than the recorded version.
///
/// Synchronous; call it through [`crate::Database::execute`].
pub fn run_all(conn: &Connection) -> StoreResult<()> {
    ensure_migrations_table(conn)?;

    let current = current_version(conn)?;
    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > current).collect();

    if pending.is_empty() {
        debug!(current_version = current, "schema is up to date");
        return Ok(());
    }

    info!(current_version = current, pending = pending.len(), "running migrations");
    for migration in pending {
        apply(conn, migration)?;
    }
    Ok(())
}

/// Latest applied version, or 0 on a fresh database.
pub fn current_version(conn: &Connection) -> StoreResult<u32> {
    ensure_migrations_table(conn)?;
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM _migrations",
        [],
        |row| row.get(0),
    )
    .map_err(|e| StoreError::Migration {
        version: 0,
        message: format!("failed to read current version: {e}"),
    })
}

fn ensure_migrations_table(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version     INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at  INTEGER NOT NULL
        );",
    )
    .map_err(|e| StoreError::Migration {
        version: 0,
        message: format!("failed to create _migrations table: {e}"),
    })
}

/// Apply one migration atomically. A failure rolls the whole batch back.
fn apply(conn: &Connection, migration: &Migration) -> StoreResult<()> {
    let failed = |stage: &str, e: rusqlite::Error| StoreError::Migration {
        version: migration.version,
        message: format!("{stage}: {e}"),
    };

    info!(version = migration.version, description = migration.description, "applying migration");

    // `unchecked_transaction` works on a shared `&Connection`; dropping it
    // without commit rolls back.
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| failed("begin", e))?;

    if let Err(e) = tx.execute_batch(migration.sql) {
        warn!(version = migration.version, err = %e, "migration failed, rolling back");
        return Err(failed("sql", e));
    }

    tx.execute(
        "INSERT INTO _migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.description,
            chrono::Utc::now().timestamp()
        ],
    )
    .map_err(|e| failed("record", e))?;

    tx.commit().map_err(|e| failed("commit", e))
}

// ── tests ────────────────────────────────────────────────────────────
