//! Core state logic for the task list.
//! This crate is the single source of truth for task invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{StorageConfig, DEFAULT_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{FilterMode, FilterParseError, Task, TaskId};
pub use model::title::{
    is_title_whitespace, is_valid_title, trim_title, validate_title, TaskInput,
    TitleValidationError,
};
pub use repo::slot_repo::{RepoError, RepoResult, SlotRepository, SqliteSlotRepository};
pub use service::persistence_bridge::{PersistError, PersistResult, PersistenceBridge};
pub use service::todo_service::TodoService;
pub use store::filter::{filter_tasks, FilterSelector, VisibleTask};
pub use store::task_store::{SubscriptionId, TaskStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Opens the configured database and hydrates a service from it.
///
/// # Errors
/// - Returns `RepoError::Db` when the database cannot be opened or migrated.
pub fn open_service(config: &StorageConfig) -> RepoResult<TodoService<SqliteSlotRepository>> {
    let conn = db::open_db(&config.db_path)?;
    let repo = SqliteSlotRepository::try_new(conn)?;
    Ok(TodoService::open(repo, config.storage_key.as_str()))
}

/// Hydrates a service backed by a private in-memory database.
///
/// # Errors
/// - Returns `RepoError::Db` when SQLite cannot be initialized.
pub fn open_in_memory_service(
    storage_key: &str,
) -> RepoResult<TodoService<SqliteSlotRepository>> {
    let conn = db::open_db_in_memory()?;
    let repo = SqliteSlotRepository::try_new(conn)?;
    Ok(TodoService::open(repo, storage_key))
}
