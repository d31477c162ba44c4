//! # profeshare-store
//!
//! Storage engine for Profeshare.
//!
//! SQLite-backed persistence in WAL mode for sign-in accounts, student
//! profiles and the active session, plus an optional `moka` cache in front
//! of profile lookups.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  ProfileCache (moka, keyed by student)  │
//! ├─────────────────────────────────────────┤
//! │  AccountStore   (accounts)              │
//! │  ProfileStore   (student_profiles)      │
//! │  SessionStore   (sessions)              │
//! ├─────────────────────────────────────────┤
//! │  Database (rusqlite WAL)                │
//! │  Migrations (versioned, transactional)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Skills are stored exactly as written and normalized on read with
//! `profeshare-skills`.
//!
//! ## Quick start
//!
//! ```ignore
//! use profeshare_store::{Database, NewProfile, ProfileStore};
//!
//! let db = Database::open_and_migrate("data/profeshare.db").await?;
//! let profiles = ProfileStore::new(db.clone());
//! profiles
//!     .create(NewProfile::new("S1001", "Ishaan", "Malik", "ishaan@example.com"))
//!     .await?;
//! let skills = profiles.get_by_student_id("S1001").await?.map(|p| p.skills());
//! ```

pub mod account;
pub mod cache;
pub mod db;
pub mod error;
pub mod migration;
mod password;
pub mod profile;
pub mod session;

// ── re-exports ───────────────────────────────────────────────────────

pub use account::{Account, AccountStore, normalize_email};
pub use cache::{CacheStats, ProfileCache};
pub use db::Database;
pub use error::{StoreError, StoreResult};
pub use profile::{NewProfile, ProfileStore, ProfileUpdate, StudentProfile};
pub use session::{Session, SessionStore};
