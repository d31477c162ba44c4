//! Shared helper functions used across CLI subcommands.

use anyhow::{Context, Result};
use profeshare_skills::RawSkillsValue;
use profeshare_store::{
    AccountStore, Database, ProfileCache, ProfileStore, SessionStore, StudentProfile,
};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// Handles to every store, sharing one database connection.
pub struct Stores {
    pub db: Database,
    pub accounts: AccountStore,
    pub profiles: ProfileStore,
    pub sessions: SessionStore,
}

impl Stores {
    /// Open the configured database, migrating it if needed.
    pub async fn open(config: &AppConfig) -> Result<Self> {
        let path = config.store.path.clone();
        let display = path.display().to_string();
        let db = Database::open_and_migrate(path)
            .await
            .with_context(|| format!("failed to open database at {display}"))?;

        let mut profiles = ProfileStore::new(db.clone());
        if config.store.cache_capacity > 0 {
            profiles = profiles.with_cache(ProfileCache::new(
                config.store.cache_capacity,
                config.store.cache_ttl(),
            ));
        }

        Ok(Self {
            accounts: AccountStore::new(db.clone()),
            sessions: SessionStore::new(db.clone()),
            profiles,
            db,
        })
    }

    /// Fetch a profile, failing when it does not exist.
    pub async fn require_profile(&self, student_id: &str) -> Result<StudentProfile> {
        self.profiles
            .get_by_student_id(student_id)
            .await
            .context("failed to load profile")?
            .with_context(|| format!("no profile for student id {student_id}"))
    }

    /// Student id of the signed-in account.
    pub async fn signed_in_student_id(&self) -> Result<String> {
        let (_, account) = self
            .sessions
            .current()
            .await
            .context("failed to read session")?
            .context("not signed in; pass a student id or run `profeshare login`")?;
        Ok(account.student_id)
    }
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

/// Interpret a command-line skills argument: JSON when it has a skills
/// shape, literal text otherwise.
pub fn raw_skills_arg(arg: &str) -> RawSkillsValue {
    let raw = RawSkillsValue::from_json_text(arg);
    debug!(kind = raw.kind(), "skills argument decoded");
    raw
}

/// Interpret a JSON-valued option. Text that is not JSON becomes a JSON
/// string.
pub fn json_arg(arg: &str) -> Value {
    serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.to_owned()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
