//! Application configuration.
//!
//! Reads `config/default.toml` (or the file named by `PROFESHARE_CONFIG`).
//! Missing files, sections and keys fall back to defaults. `PROFESHARE_DB`
//! overrides the database path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const CONFIG_PATH_ENV: &str = "PROFESHARE_CONFIG";
pub const DB_PATH_ENV: &str = "PROFESHARE_DB";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub log: LogConfig,
}

/// The `[store]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file.
    pub path: PathBuf,
    /// Maximum cached profiles. 0 disables the cache.
    pub cache_capacity: u64,
    pub cache_ttl_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/profeshare.db"),
            cache_capacity: 256,
            cache_ttl_seconds: 300,
        }
    }
}

impl StoreConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

/// The `[log]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
        }
    }
}

impl AppConfig {
    /// Load from the configured path and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let mut config = Self::load_from(&path)?;
        config.apply_db_override(std::env::var(DB_PATH_ENV).ok());
        Ok(config)
    }

    /// Load from `path`. A missing file yields the defaults; a malformed one
    /// is an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        Self::from_toml_str(&content).with_context(|| format!("invalid config in {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Replace the database path when `value` is set and non-blank.
    pub fn apply_db_override(&mut self, value: Option<String>) {
        if let Some(path) = value.filter(|v| !v.trim().is_empty()) {
            self.store.path = PathBuf::from(path.trim());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.store.path, PathBuf::from("data/profeshare.db"));
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [store]
            cache_capacity = 0

            [log]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.store.cache_capacity, 0);
        assert_eq!(config.store.cache_ttl_seconds, 300);
        assert_eq!(config.store.path, PathBuf::from("data/profeshare.db"));
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(AppConfig::from_toml_str("[store\npath = ").is_err());
        assert!(AppConfig::from_toml_str("[store]\ncache_capacity = \"many\"").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profeshare.toml");
        std::fs::write(&path, "[store]\npath = \"/tmp/other.db\"\ncache_ttl_seconds = 5\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.store.path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.store.cache_ttl(), Duration::from_secs(5));
    }

    #[test]
    fn db_override_replaces_path() {
        let mut config = AppConfig::default();
        config.apply_db_override(Some("  ".into()));
        assert_eq!(config.store.path, PathBuf::from("data/profeshare.db"));

        config.apply_db_override(None);
        assert_eq!(config.store.path, PathBuf::from("data/profeshare.db"));

        config.apply_db_override(Some("elsewhere.db".into()));
        assert_eq!(config.store.path, PathBuf::from("elsewhere.db"));
    }
}
