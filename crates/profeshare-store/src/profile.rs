//! Student profile records.
//!
//! The free-form columns (`skills`, `projects`, `experience`,
//! `certifications_and_licenses`, `job_preferences`) hold JSON text exactly
//! as written. Skills are normalized on read through `profeshare-skills`;
//! the stored value is never rewritten in normalized form.

use chrono::Utc;
use profeshare_skills::{CategorizedSkills, RawSkillsValue, SkillName, SkillsOverview};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::account::{normalize_email, optional};
use crate::cache::ProfileCache;
use crate::db::Database;
use crate::error::{StoreError, StoreResult, unique_violation};

const COLUMNS: &str = "id, student_id, first_name, last_name, email, skills, projects, \
                       experience, certifications_and_licenses, job_preferences, \
                       profile_image, created_at, updated_at";

/// One row of `student_profiles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: String,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Raw skills field; see [`StudentProfile::skills`].
    #[serde(default)]
    pub skills: RawSkillsValue,
    pub projects: Option<Value>,
    pub experience: Option<Value>,
    pub certifications_and_licenses: Option<Value>,
    pub job_preferences: Option<Value>,
    pub profile_image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl StudentProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Normalized skill list.
    pub fn skills(&self) -> Vec<SkillName> {
        profeshare_skills::parse(&self.skills)
    }

    pub fn categorized_skills(&self) -> CategorizedSkills {
        profeshare_skills::categorize(&self.skills())
    }

    pub fn skills_overview(&self) -> SkillsOverview {
        SkillsOverview::from_skills(&self.skills())
    }

    /// Projects as a list. A non-array value yields an empty list.
    pub fn project_list(&self) -> &[Value] {
        match &self.projects {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }
}

/// Fields for a new profile.
#[derive(Debug, Clone, Default)]
pub struct NewProfile {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub skills: RawSkillsValue,
    pub projects: Option<Value>,
    pub experience: Option<Value>,
    pub certifications_and_licenses: Option<Value>,
    pub job_preferences: Option<Value>,
    pub profile_image: Option<String>,
}

impl NewProfile {
    pub fn new(
        student_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_skills(mut self, skills: impl Into<RawSkillsValue>) -> Self {
        self.skills = skills.into();
        self
    }

    pub(crate) fn into_profile(self, id: impl Into<String>, now: i64) -> StudentProfile {
        StudentProfile {
            id: id.into(),
            student_id: self.student_id.trim().to_owned(),
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            email: normalize_email(&self.email),
            skills: self.skills,
            projects: self.projects,
            experience: self.experience,
            certifications_and_licenses: self.certifications_and_licenses,
            job_preferences: self.job_preferences,
            profile_image: self.profile_image,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub projects: Option<Value>,
    pub experience: Option<Value>,
    pub certifications_and_licenses: Option<Value>,
    pub job_preferences: Option<Value>,
    pub profile_image: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.projects.is_none()
            && self.experience.is_none()
            && self.certifications_and_licenses.is_none()
            && self.job_preferences.is_none()
            && self.profile_image.is_none()
    }
}

/// CRUD on student profiles, with an optional read cache.
#[derive(Clone)]
pub struct ProfileStore {
    db: Database,
    cache: Option<ProfileCache>,
}

impl ProfileStore {
    pub fn new(db: Database) -> Self {
        Self { db, cache: None }
    }

    /// Serve [`ProfileStore::get_by_student_id`] from `cache` when possible.
    pub fn with_cache(mut self, cache: ProfileCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&ProfileCache> {
        self.cache.as_ref()
    }

    /// Insert a new profile. The student id must be non-empty and unused.
    #[instrument(skip(self, new), fields(student_id = %new.student_id))]
    pub async fn create(&self, new: NewProfile) -> StoreResult<StudentProfile> {
        if new.student_id.trim().is_empty() {
            return Err(StoreError::InvalidArgument("student id must not be empty".into()));
        }

        let profile = new.into_profile(Uuid::now_v7().to_string(), Utc::now().timestamp());
        let row = profile.clone();

        self.db
            .execute(move |conn| {
                conn.execute(
                    &format!(
                        "INSERT INTO student_profiles ({COLUMNS}) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
                    ),
                    rusqlite::params![
                        row.id,
                        row.student_id,
                        row.first_name,
                        row.last_name,
                        row.email,
                        encode_skills(&row.skills)?,
                        encode_json(row.projects.as_ref())?,
                        encode_json(row.experience.as_ref())?,
                        encode_json(row.certifications_and_licenses.as_ref())?,
                        encode_json(row.job_preferences.as_ref())?,
                        row.profile_image,
                        row.created_at,
                        row.updated_at,
                    ],
                )
                .map_err(|e| unique_violation(e, "student profile", &row.student_id))?;
                Ok(())
            })
            .await?;

        debug!(profile_id = %profile.id, "profile created");
        Ok(profile)
    }

    /// Fetch a profile by student id.
    #[instrument(skip(self))]
    pub async fn get_by_student_id(&self, student_id: &str) -> StoreResult<Option<StudentProfile>> {
        let student_id = student_id.trim().to_owned();
        if let Some(cache) = &self.cache
            && let Some(hit) = cache.get(&student_id).await
        {
            return Ok(Some(hit));
        }

        let seen = self.cache.as_ref().map(ProfileCache::generation);
        let found = self
            .query_one(
                format!("SELECT {COLUMNS} FROM student_profiles WHERE student_id = ?1"),
                vec![student_id],
            )
            .await?;

        if let (Some(cache), Some(seen), Some(profile)) = (&self.cache, seen, &found) {
            cache.insert_if_current(profile, seen).await;
        }
        Ok(found)
    }

    /// Fetch the oldest profile registered under `email`.
    #[instrument(skip(self))]
    pub async fn get_by_email(&self, email: &str) -> StoreResult<Option<StudentProfile>> {
        self.query_one(
            format!(
                "SELECT {COLUMNS} FROM student_profiles WHERE email = ?1 \
                 ORDER BY created_at ASC, id ASC LIMIT 1"
            ),
            vec![normalize_email(email)],
        )
        .await
    }

    /// Case-insensitive lookup by first and last name.
    #[instrument(skip(self))]
    pub async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> StoreResult<Option<StudentProfile>> {
        self.query_one(
            format!(
                "SELECT {COLUMNS} FROM student_profiles \
                 WHERE first_name = ?1 COLLATE NOCASE AND last_name = ?2 COLLATE NOCASE \
                 ORDER BY created_at ASC, id ASC LIMIT 1"
            ),
            vec![first_name.trim().to_owned(), last_name.trim().to_owned()],
        )
        .await
    }

    /// Most recently created profiles first.
    #[instrument(skip(self))]
    pub async fn list_recent(&self, limit: u32) -> StoreResult<Vec<StudentProfile>> {
        self.db
            .execute(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COLUMNS} FROM student_profiles \
                     ORDER BY created_at DESC, id DESC LIMIT ?1"
                ))?;
                let rows = stmt
                    .query_map(rusqlite::params![limit], ProfileRow::read)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows.into_iter().map(ProfileRow::into_profile).collect())
            })
            .await
    }

    /// Apply a partial update.
    #[instrument(skip(self, update))]
    pub async fn update(&self, student_id: &str, update: ProfileUpdate) -> StoreResult<()> {
        if update.is_empty() {
            return Err(StoreError::InvalidArgument("nothing to update".into()));
        }

        let key = student_id.trim().to_owned();
        let now = Utc::now().timestamp();
        let first_name = update.first_name.map(|s| s.trim().to_owned());
        let last_name = update.last_name.map(|s| s.trim().to_owned());
        let email = update.email.as_deref().map(normalize_email);
        let projects = encode_json(update.projects.as_ref())?;
        let experience = encode_json(update.experience.as_ref())?;
        let certifications = encode_json(update.certifications_and_licenses.as_ref())?;
        let job_preferences = encode_json(update.job_preferences.as_ref())?;
        let profile_image = update.profile_image;

        let target = key.clone();
        self.db
            .execute(move |conn| {
                let updated = conn.execute(
                    "UPDATE student_profiles SET \
                         first_name = COALESCE(?2, first_name), \
                         last_name = COALESCE(?3, last_name), \
                         email = COALESCE(?4, email), \
                         projects = COALESCE(?5, projects), \
                         experience = COALESCE(?6, experience), \
                         certifications_and_licenses = COALESCE(?7, certifications_and_licenses), \
                         job_preferences = COALESCE(?8, job_preferences), \
                         profile_image = COALESCE(?9, profile_image), \
                         updated_at = ?10 \
                     WHERE student_id = ?1",
                    rusqlite::params![
                        target,
                        first_name,
                        last_name,
                        email,
                        projects,
                        experience,
                        certifications,
                        job_preferences,
                        profile_image,
                        now,
                    ],
                )?;
                if updated == 0 {
                    return Err(StoreError::NotFound {
                        entity: "student profile",
                        key: target,
                    });
                }
                Ok(())
            })
            .await?;

        self.invalidate(&key).await;
        debug!(student_id = %key, "profile updated");
        Ok(())
    }

    /// Replace the stored skills value verbatim.
    #[instrument(skip(self, skills))]
    pub async fn set_skills(&self, student_id: &str, skills: &RawSkillsValue) -> StoreResult<()> {
        let key = student_id.trim().to_owned();
        let encoded = encode_skills(skills)?;
        let now = Utc::now().timestamp();

        let target = key.clone();
        self.db
            .execute(move |conn| {
                let updated = conn.execute(
                    "UPDATE student_profiles SET skills = ?2, updated_at = ?3 WHERE student_id = ?1",
                    rusqlite::params![target, encoded, now],
                )?;
                if updated == 0 {
                    return Err(StoreError::NotFound {
                        entity: "student profile",
                        key: target,
                    });
                }
                Ok(())
            })
            .await?;

        self.invalidate(&key).await;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn count(&self) -> StoreResult<i64> {
        self.db
            .execute(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM student_profiles", [], |row| row.get(0))?)
            })
            .await
    }

    async fn query_one(
        &self,
        sql: String,
        params: Vec<String>,
    ) -> StoreResult<Option<StudentProfile>> {
        self.db
            .execute(move |conn| {
                let found = conn.query_row(
                    &sql,
                    rusqlite::params_from_iter(params.iter()),
                    ProfileRow::read,
                );
                Ok(optional(found)?.map(ProfileRow::into_profile))
            })
            .await
    }

    async fn invalidate(&self, student_id: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(student_id).await;
        }
    }
}

// ── column encoding ──────────────────────────────────────────────────

/// `Absent` is stored as SQL NULL, anything else as JSON text.
fn encode_skills(skills: &RawSkillsValue) -> StoreResult<Option<String>> {
    match skills {
        RawSkillsValue::Absent => Ok(None),
        other => Ok(Some(serde_json::to_string(other)?)),
    }
}

fn encode_json(value: Option<&Value>) -> StoreResult<Option<String>> {
    value.map(serde_json::to_string).transpose().map_err(Into::into)
}

/// Columns written by other tools may hold plain text rather than JSON;
/// such text is kept as a JSON string.
fn decode_json(text: Option<String>) -> Option<Value> {
    text.map(|t| serde_json::from_str(&t).unwrap_or(Value::String(t)))
}

fn decode_skills(text: Option<String>) -> RawSkillsValue {
    text.as_deref()
        .map(RawSkillsValue::from_json_text)
        .unwrap_or_default()
}

/// Raw column values before JSON decoding.
struct ProfileRow {
    id: String,
    student_id: String,
    first_name: String,
    last_name: String,
    email: String,
    skills: Option<String>,
    projects: Option<String>,
    experience: Option<String>,
    certifications_and_licenses: Option<String>,
    job_preferences: Option<String>,
    profile_image: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl ProfileRow {
    fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            student_id: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            email: row.get(4)?,
            skills: row.get(5)?,
            projects: row.get(6)?,
            experience: row.get(7)?,
            certifications_and_licenses: row.get(8)?,
            job_preferences: row.get(9)?,
            profile_image: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }

    fn into_profile(self) -> StudentProfile {
        StudentProfile {
            id: self.id,
            student_id: self.student_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            skills: decode_skills(self.skills),
            projects: decode_json(self.projects),
            experience: decode_json(self.experience),
            certifications_and_licenses: decode_json(self.certifications_and_licenses),
            job_preferences: decode_json(self.job_preferences),
            profile_image: self.profile_image,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// ── tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use profeshare_skills::SkillCategory;
    use serde_json::json;

    use super::*;

    async fn setup_store() -> ProfileStore {
        let db = Database::open_in_memory().unwrap();
        db.run_migrations().await.unwrap();
        ProfileStore::new(db)
    }

    fn ishaan() -> NewProfile {
        NewProfile::new("S1001", "Ishaan", "Malik", "Ishaan.Malik@example.com")
            .with_skills(r#"["Python","Linux","Networking"]"#)
    }

    #[tokio::test]
    async fn create_and_fetch_by_student_id() {
        let store = setup_store().await;
        let created = store.create(ishaan()).await.unwrap();
        assert_eq!(created.email, "ishaan.malik@example.com");
        assert_eq!(created.created_at, created.updated_at);

        let fetched = store.get_by_student_id("S1001").await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.full_name(), "Ishaan Malik");
    }

    #[tokio::test]
    async fn missing_profile_is_none() {
        let store = setup_store().await;
        assert!(store.get_by_student_id("nope").await.unwrap().is_none());
        assert!(store.get_by_email("nope@example.com").await.unwrap().is_none());
        assert!(store.find_by_name("No", "Body").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lookup_by_email_and_name() {
        let store = setup_store().await;
        store.create(ishaan()).await.unwrap();

        let by_email = store.get_by_email(" ISHAAN.MALIK@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().student_id, "S1001");

        let by_name = store.find_by_name("ishaan", "MALIK").await.unwrap();
        assert_eq!(by_name.unwrap().student_id, "S1001");
    }

    #[tokio::test]
    async fn duplicate_student_id_rejected() {
        let store = setup_store().await;
        store.create(ishaan()).await.unwrap();
        match store.create(ishaan()).await.unwrap_err() {
            StoreError::AlreadyExists { entity, key } => {
                assert_eq!(entity, "student profile");
                assert_eq!(key, "S1001");
            }
            other => panic!("expected AlreadyExists, got: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_student_id_rejected() {
        let store = setup_store().await;
        let result = store.create(NewProfile::new(" ", "A", "B", "a@b.c")).await;
        assert!(matches!(result, Err(StoreError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn skills_shape_survives_round_trip() {
        let store = setup_store().await;
        let created = store.create(ishaan()).await.unwrap();
        let fetched = store.get_by_student_id("S1001").await.unwrap().unwrap();

        // Stored as a JSON-encoded string, read back as the same string.
        assert_eq!(fetched.skills, created.skills);
        assert!(matches!(fetched.skills, RawSkillsValue::Text(_)));

        let names: Vec<String> = fetched.skills().into_iter().map(|s| s.into_string()).collect();
        assert_eq!(names, vec!["Python", "Linux", "Networking"]);

        let grouped = fetched.categorized_skills();
        assert_eq!(grouped.get(SkillCategory::CloudDevOps).unwrap()[0], "Linux");
        assert_eq!(grouped.get(SkillCategory::Networking).unwrap()[0], "Networking");
    }

    #[tokio::test]
    async fn set_skills_accepts_every_shape() {
        let store = setup_store().await;
        store.create(ishaan()).await.unwrap();

        let mapping = RawSkillsValue::from(json!({"languages": ["Rust"], "tools": ["Git"]}));
        store.set_skills("S1001", &mapping).await.unwrap();
        let fetched = store.get_by_student_id("S1001").await.unwrap().unwrap();
        assert_eq!(fetched.skills, mapping);
        assert_eq!(fetched.skills().len(), 2);

        store.set_skills("S1001", &RawSkillsValue::Absent).await.unwrap();
        let fetched = store.get_by_student_id("S1001").await.unwrap().unwrap();
        assert_eq!(fetched.skills, RawSkillsValue::Absent);
        assert!(fetched.skills().is_empty());
    }

    #[tokio::test]
    async fn set_skills_on_missing_profile() {
        let store = setup_store().await;
        let result = store.set_skills("ghost", &RawSkillsValue::from("Rust")).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn legacy_plain_text_column_is_read_as_text() {
        let store = setup_store().await;
        store.create(ishaan()).await.unwrap();
        store
            .db
            .execute(|conn| {
                conn.execute(
                    "UPDATE student_profiles SET skills = 'Ethical Hacking' WHERE student_id = 'S1001'",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let fetched = store.get_by_student_id("S1001").await.unwrap().unwrap();
        assert_eq!(fetched.skills, RawSkillsValue::from("Ethical Hacking"));
        assert_eq!(fetched.skills()[0], "Ethical Hacking");

        store
            .db
            .execute(|conn| {
                conn.execute("UPDATE student_profiles SET skills = '42' WHERE student_id = 'S1001'", [])?;
                Ok(())
            })
            .await
            .unwrap();
        let fetched = store.get_by_student_id("S1001").await.unwrap().unwrap();
        assert_eq!(fetched.skills, RawSkillsValue::from("42"));
    }

    #[tokio::test]
    async fn partial_update_keeps_other_columns() {
        let store = setup_store().await;
        store.create(ishaan()).await.unwrap();

        store
            .update(
                "S1001",
                ProfileUpdate {
                    last_name: Some("Malik-Khan".into()),
                    projects: Some(json!([{"name": "Port scanner", "description": "Rust"}])),
                    job_preferences: Some(json!({"location": "Remote"})),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap();

        let fetched = store.get_by_student_id("S1001").await.unwrap().unwrap();
        assert_eq!(fetched.first_name, "Ishaan");
        assert_eq!(fetched.last_name, "Malik-Khan");
        assert_eq!(fetched.project_list().len(), 1);
        assert_eq!(fetched.job_preferences, Some(json!({"location": "Remote"})));
        assert_eq!(fetched.skills().len(), 3);
    }

    #[tokio::test]
    async fn empty_update_rejected() {
        let store = setup_store().await;
        store.create(ishaan()).await.unwrap();
        let result = store.update("S1001", ProfileUpdate::default()).await;
        assert!(matches!(result, Err(StoreError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn update_missing_profile_is_not_found() {
        let store = setup_store().await;
        let update = ProfileUpdate {
            first_name: Some("X".into()),
            ..ProfileUpdate::default()
        };
        match store.update("ghost", update).await.unwrap_err() {
            StoreError::NotFound { entity, key } => {
                assert_eq!(entity, "student profile");
                assert_eq!(key, "ghost");
            }
            other => panic!("expected NotFound, got: {other}"),
        }
    }

    #[tokio::test]
    async fn list_recent_is_newest_first() {
        let store = setup_store().await;
        for i in 0..4 {
            store
                .create(NewProfile::new(format!("S{i}"), "First", format!("Last{i}"), "x@y.z"))
                .await
                .unwrap();
        }
        assert_eq!(store.count().await.unwrap(), 4);

        let recent = store.list_recent(3).await.unwrap();
        assert_eq!(recent.len(), 3);
        // UUID v7 ids break same-second ties in creation order.
        assert_eq!(recent[0].student_id, "S3");
        assert_eq!(recent[2].student_id, "S1");
    }

    #[tokio::test]
    async fn cache_is_filled_and_invalidated() {
        let store = setup_store()
            .await
            .with_cache(ProfileCache::new(32, Duration::from_secs(60)));
        store.create(ishaan()).await.unwrap();

        store.get_by_student_id("S1001").await.unwrap();
        store.get_by_student_id("S1001").await.unwrap();
        let stats = store.cache().unwrap().stats();
        assert_eq!(stats.misses(), 1);
        assert_eq!(stats.hits(), 1);

        store
            .set_skills("S1001", &RawSkillsValue::from(json!(["Go"])))
            .await
            .unwrap();
        let fetched = store.get_by_student_id("S1001").await.unwrap().unwrap();
        assert_eq!(fetched.skills()[0], "Go");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reader_never_caches_over_a_finished_write() {
        let store = setup_store()
            .await
            .with_cache(ProfileCache::new(32, Duration::from_secs(300)));
        store.create(ishaan()).await.unwrap();

        let mut stale = 0;
        for i in 0..300 {
            let reader = store.clone();
            let writer = store.clone();
            let read = tokio::spawn(async move { reader.get_by_student_id("S1001").await });
            let write = tokio::spawn(async move {
                writer
                    .set_skills("S1001", &RawSkillsValue::from(json!([format!("New{i}")])))
                    .await
            });
            read.await.unwrap().unwrap();
            write.await.unwrap().unwrap();

            let fetched = store.get_by_student_id("S1001").await.unwrap().unwrap();
            if fetched.skills()[0] != format!("New{i}").as_str() {
                stale += 1;
            }
        }
        assert_eq!(stale, 0, "stale cached reads after a completed write");
    }
}
