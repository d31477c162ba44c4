//! Sign-in accounts.
//!
//! An account links an email and password to a student id. Passwords are
//! never stored in clear; see [`crate::password`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{StoreError, StoreResult, unique_violation};
use crate::password;

/// A sign-in account, without its password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// UUID v7.
    pub id: String,
    /// Trimmed, lower-cased email. Unique.
    pub email: String,
    /// Student id of the profile this account signs in to.
    pub student_id: String,
    /// Unix timestamp.
    pub created_at: i64,
}

/// Canonical form used for every email comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Account creation and credential checks.
#[derive(Clone)]
pub struct AccountStore {
    db: Database,
}

impl AccountStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Register a new account.
    ///
    /// Fails with [`StoreError::AlreadyExists`] when the email is taken.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        student_id: &str,
    ) -> StoreResult<Account> {
        let email = normalize_email(email);
        let student_id = student_id.trim().to_owned();
        if email.is_empty() {
            return Err(StoreError::InvalidArgument("email must not be empty".into()));
        }
        if password.is_empty() {
            return Err(StoreError::InvalidArgument("password must not be empty".into()));
        }
        if student_id.is_empty() {
            return Err(StoreError::InvalidArgument("student id must not be empty".into()));
        }

        let password_hash = password::hash(password)?;
        let account = Account {
            id: Uuid::now_v7().to_string(),
            email,
            student_id,
            created_at: Utc::now().timestamp(),
        };

        let row = account.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO accounts (id, email, student_id, password_hash, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![
                        row.id,
                        row.email,
                        row.student_id,
                        password_hash,
                        row.created_at
                    ],
                )
                .map_err(|e| unique_violation(e, "account", &row.email))?;
                Ok(())
            })
            .await?;

        debug!(account_id = %account.id, "account created");
        Ok(account)
    }

    /// Check credentials. `Ok(None)` covers both an unknown email and a
    /// wrong password.
    ///
    /// The hash comparison runs on its own blocking task, after the
    /// connection has been released.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> StoreResult<Option<Account>> {
        let email = normalize_email(email);

        let found = self
            .db
            .execute(move |conn| {
                let found = conn.query_row(
                    "SELECT id, email, student_id, created_at, password_hash \
                     FROM accounts WHERE email = ?1",
                    rusqlite::params![email],
                    |row| Ok((account_from_row(row)?, row.get::<_, String>(4)?)),
                );
                optional(found)
            })
            .await?;

        let Some((account, stored)) = found else {
            return Ok(None);
        };

        let password = password.to_owned();
        let matches =
            tokio::task::spawn_blocking(move || password::verify(&password, &stored)).await??;
        if matches {
            Ok(Some(account))
        } else {
            debug!("password mismatch");
            Ok(None)
        }
    }

    /// Look an account up by email.
    #[instrument(skip(self))]
    pub async fn get_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let email = normalize_email(email);
        self.db
            .execute(move |conn| {
                let found = conn.query_row(
                    "SELECT id, email, student_id, created_at FROM accounts WHERE email = ?1",
                    rusqlite::params![email],
                    account_from_row,
                );
                optional(found)
            })
            .await
    }

    /// Replace an account's password.
    #[instrument(skip(self, new_password))]
    pub async fn change_password(&self, email: &str, new_password: &str) -> StoreResult<()> {
        if new_password.is_empty() {
            return Err(StoreError::InvalidArgument("password must not be empty".into()));
        }
        let email = normalize_email(email);
        let password_hash = password::hash(new_password)?;

        self.db
            .execute(move |conn| {
                let updated = conn.execute(
                    "UPDATE accounts SET password_hash = ?2 WHERE email = ?1",
                    rusqlite::params![email, password_hash],
                )?;
                if updated == 0 {
                    return Err(StoreError::NotFound {
                        entity: "account",
                        key: email,
                    });
                }
                Ok(())
            })
            .await
    }
}

/// Columns: id, email, student_id, created_at.
pub(crate) fn account_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        email: row.get(1)?,
        student_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Turn "no rows" into `Ok(None)`.
pub(crate) fn optional<T>(result: rusqlite::Result<T>) -> StoreResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(StoreError::Sqlite(e)),
    }
}

// ── tests ────────────────────────────────────────────────────────────
