//! Storage configuration resolution.
//!
//! # Responsibility
//! - Resolve where the durable task slot lives.
//! - Keep environment lookups in one place so callers stay testable.
//!
//! # Invariants
//! - The resolved database path is never empty.
//! - The storage key is never empty.

use std::path::PathBuf;

/// Slot key holding the serialized task list.
pub const DEFAULT_STORAGE_KEY: &str = "tasks";
/// Environment variable overriding the database file path.
pub const DB_PATH_ENV: &str = "TASKLIST_DB_PATH";
/// File name used under the OS temp dir when no override is set.
pub const DEFAULT_DB_FILE_NAME: &str = "tasklist.sqlite3";

/// Location of the durable task slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub db_path: PathBuf,
    pub storage_key: String,
}

impl StorageConfig {
    /// Uses `db_path` with the default storage key.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    /// Resolves configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`.
    ///
    /// Blank overrides are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = lookup(DB_PATH_ENV)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);
        Self::new(db_path)
    }

    /// Replaces the storage key; blank keys keep the current one.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !key.trim().is_empty() {
            self.storage_key = key.trim().to_string();
        }
        self
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(default_db_path())
    }
}

/// Default database path under the OS temp dir.
pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
