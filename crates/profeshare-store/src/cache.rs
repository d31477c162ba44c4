//! Hot cache for profile lookups, backed by [`moka`].
//!
//! Keyed by student id. [`crate::ProfileStore`] fills it on reads and
//! invalidates the key on every write to that profile.
//!
//! Every invalidation bumps a write generation. A reader snapshots the
//! generation before querying the database and only keeps its result in
//! the cache if no write landed in between, so a row read before a
//! concurrent write can never outlive that write's invalidation.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use crate::profile::StudentProfile;

/// Hit/miss counters.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Hits over total lookups; 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses();
        if total == 0 {
            return 0.0;
        }
        self.hits() as f64 / total as f64
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={} misses={} rate={:.2}%",
            self.hits(),
            self.misses(),
            self.hit_rate() * 100.0
        )
    }
}

/// Cloneable handle to a shared profile cache.
#[derive(Clone)]
pub struct ProfileCache {
    inner: Cache<String, StudentProfile>,
    stats: Arc<CacheStats>,
    generation: Arc<AtomicU64>,
}

impl ProfileCache {
    /// Cache holding at most `max_capacity` profiles, each for `ttl`.
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        debug!(max_capacity, ttl_seconds = ttl.as_secs(), "profile cache created");
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
            stats: Arc::new(CacheStats::default()),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current write generation. Take it before reading the row that will
    /// be passed to [`ProfileCache::insert_if_current`].
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn get(&self, student_id: &str) -> Option<StudentProfile> {
        let found = self.inner.get(student_id).await;
        if found.is_some() {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            debug!(student_id, "profile cache hit");
        } else {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
            debug!(student_id, "profile cache miss");
        }
        found
    }

    pub async fn insert(&self, profile: &StudentProfile) {
        self.inner
            .insert(profile.student_id.clone(), profile.clone())
            .await;
    }

    /// Cache a row read at generation `seen`, unless a write has been
    /// invalidated since. Returns whether the entry was kept.
    pub async fn insert_if_current(&self, profile: &StudentProfile, seen: u64) -> bool {
        if self.generation() != seen {
            debug!(student_id = %profile.student_id, "profile cache insert skipped, stale read");
            return false;
        }
        self.insert(profile).await;
        // A write may have invalidated between the check and the insert.
        if self.generation() != seen {
            self.inner.invalidate(profile.student_id.as_str()).await;
            debug!(student_id = %profile.student_id, "profile cache insert rolled back, stale read");
            return false;
        }
        true
    }

    /// Drop `student_id`. Call after the write has committed.
    pub async fn invalidate(&self, student_id: &str) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.invalidate(student_id).await;
        debug!(student_id, "profile cache invalidate");
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

// ── tests ────────────────────────────────────────────────────────────
