//! The signed-in session.
//!
//! One session at a time: starting a new one replaces whatever was there.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::account::{Account, account_from_row, optional};
use crate::db::Database;
use crate::error::StoreResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub account_id: String,
    pub created_at: i64,
}

#[derive(Clone)]
pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Sign `account` in, ending any previous session.
    #[instrument(skip(self, account), fields(account_id = %account.id))]
    pub async fn start(&self, account: &Account) -> StoreResult<Session> {
        let session = Session {
            token: Uuid::now_v7().to_string(),
            account_id: account.id.clone(),
            created_at: Utc::now().timestamp(),
        };

        let row = session.clone();
        self.db
            .execute_mut(move |conn| {
                let tx = conn.transaction()?;
                tx.execute("DELETE FROM sessions", [])?;
                tx.execute(
                    "INSERT INTO sessions (token, account_id, created_at) VALUES (?1, ?2, ?3)",
                    rusqlite::params![row.token, row.account_id, row.created_at],
                )?;
                tx.commit()?;
                Ok(())
            })
            .await?;

        debug!("session started");
        Ok(session)
    }

    /// The active session and its account, if anyone is signed in.
    #[instrument(skip(self))]
    pub async fn current(&self) -> StoreResult<Option<(Session, Account)>> {
        self.db
            .execute(|conn| {
                let found = conn.query_row(
                    "SELECT a.id, a.email, a.student_id, a.created_at, \
                            s.token, s.account_id, s.created_at \
                     FROM sessions s JOIN accounts a ON a.id = s.account_id \
                     ORDER BY s.created_at DESC LIMIT 1",
                    [],
                    |row| {
                        let account = account_from_row(row)?;
                        let session = Session {
                            token: row.get(4)?,
                            account_id: row.get(5)?,
                            created_at: row.get(6)?,
                        };
                        Ok((session, account))
                    },
                );
                optional(found)
            })
            .await
    }

    /// Sign out. Returns whether a session was active.
    #[instrument(skip(self))]
    pub async fn end(&self) -> StoreResult<bool> {
        let removed = self
            .db
            .execute(|conn| Ok(conn.execute("DELETE FROM sessions", [])?))
            .await?;
        debug!(removed, "session ended");
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountStore;

    async fn setup() -> (AccountStore, SessionStore) {
        let db = Database::open_in_memory().unwrap();
        db.run_migrations().await.unwrap();
        (AccountStore::new(db.clone()), SessionStore::new(db))
    }

    #[tokio::test]
    async fn no_session_by_default() {
        let (_, sessions) = setup().await;
        assert!(sessions.current().await.unwrap().is_none());
        assert!(!sessions.end().await.unwrap());
    }

    #[tokio::test]
    async fn start_current_end() {
        let (accounts, sessions) = setup().await;
        let account = accounts.sign_up("a@example.com", "pw", "S1").await.unwrap();

        let session = sessions.start(&account).await.unwrap();
        let (current, who) = sessions.current().await.unwrap().unwrap();
        assert_eq!(current, session);
        assert_eq!(who, account);

        assert!(sessions.end().await.unwrap());
        assert!(sessions.current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn new_session_replaces_old() {
        let (accounts, sessions) = setup().await;
        let first = accounts.sign_up("a@example.com", "pw", "S1").await.unwrap();
        let second = accounts.sign_up("b@example.com", "pw", "S2").await.unwrap();

        sessions.start(&first).await.unwrap();
        let latest = sessions.start(&second).await.unwrap();

        let (current, who) = sessions.current().await.unwrap().unwrap();
        assert_eq!(current.token, latest.token);
        assert_eq!(who.student_id, "S2");
    }
}
