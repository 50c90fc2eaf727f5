//! Key/value slot repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Read and overwrite named string slots.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Keys are non-empty.
//! - `write_slot` is an upsert; there is never more than one row per key.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for slot reads and writes.
#[derive(Debug)]
pub enum RepoError {
    /// Slot key was empty or whitespace-only.
    InvalidKey,
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey => write!(f, "storage slot key must not be empty"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidKey => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable key/value slot contract.
pub trait SlotRepository {
    /// Returns the stored value, or `None` when the key was never written.
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>>;
    /// Overwrites the value stored under `key`.
    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()>;
}

/// SQLite-backed slot repository owning its connection.
pub struct SqliteSlotRepository {
    conn: Connection,
}

impl SqliteSlotRepository {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - Returns `RepoError::Db` when the `storage_slots` table is missing,
    ///   i.e. the connection was not migrated.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        conn.query_row("SELECT COUNT(*) FROM storage_slots;", [], |row| {
            row.get::<_, i64>(0)
        })?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SlotRepository for SqliteSlotRepository {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        let key = normalize_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM storage_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO storage_slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

fn normalize_key(key: &str) -> RepoResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidKey);
    }
    Ok(trimmed)
}
