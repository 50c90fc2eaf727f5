//! FFI use-case API for UI-facing calls.
//!
//! # Responsibility
//! - Expose the to-do list intents to the UI shell via FRB.
//! - Keep error semantics simple: every call returns a response envelope.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One process-wide service is hydrated lazily and reused by every call.
//! - Positions in requests always address the full list, as reported in
//!   `TaskItem::position`.

use log::{error, warn};
use std::sync::{Mutex, MutexGuard, OnceLock};
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    open_in_memory_service, open_service, ping as ping_inner, FilterMode, SqliteSlotRepository,
    StorageConfig, TodoService,
};

type Service = TodoService<SqliteSlotRepository>;

static SERVICE: OnceLock<Result<Mutex<Service>, String>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One task row for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    /// Position in the full list; pass this back for position-based intents.
    pub position: u32,
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub editing: bool,
}

/// Response envelope returned by every task intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    /// Whether the intent was accepted.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
    /// Tasks visible under the active filter.
    pub items: Vec<TaskItem>,
    /// Active filter mode (`all|pending|completed`).
    pub filter: String,
    pub pending_count: u32,
    pub completed_count: u32,
}

/// Returns the visible tasks without changing anything.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_snapshot() -> TaskListResponse {
    with_service(|_| Ok("Loaded.".to_string()))
}

/// Adds a task; invalid titles are refused and leave the list unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(title: String) -> TaskListResponse {
    with_service(|service| {
        service
            .add_task(title.as_str())
            .map(|_| "Task added.".to_string())
            .map_err(|err| format!("task_add rejected: {err}"))
    })
}

/// Deletes the task at `position`; out-of-range positions change nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(position: u32) -> TaskListResponse {
    with_service(|service| {
        Ok(applied_message(
            service.delete_task(to_index(position)),
            "Task deleted.",
        ))
    })
}

/// Flips completion of the task at `position`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(position: u32) -> TaskListResponse {
    with_service(|service| {
        Ok(applied_message(
            service.toggle_completed(to_index(position)),
            "Task toggled.",
        ))
    })
}

/// Starts editing the task at `position`, ending any other edit.
#[flutter_rust_bridge::frb(sync)]
pub fn task_begin_edit(position: u32) -> TaskListResponse {
    with_service(|service| {
        Ok(applied_message(
            service.begin_edit(to_index(position)),
            "Editing task.",
        ))
    })
}

/// Commits an edit; the title is trimmed and stored without validation.
#[flutter_rust_bridge::frb(sync)]
pub fn task_commit_edit(position: u32, title: String) -> TaskListResponse {
    with_service(|service| {
        Ok(applied_message(
            service.commit_edit(to_index(position), title.as_str()),
            "Task updated.",
        ))
    })
}

/// Switches the filter mode (`all|pending|completed`).
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_set_filter(filter: String) -> TaskListResponse {
    with_service(|service| {
        let mode = filter
            .parse::<FilterMode>()
            .map_err(|err| format!("tasks_set_filter rejected: {err}"))?;
        service.set_filter(mode);
        Ok(format!("Showing {mode} tasks."))
    })
}

/// Removes every completed task.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_clear_completed() -> TaskListResponse {
    with_service(|service| {
        let removed = service.clear_completed();
        Ok(format!("Removed {removed} completed task(s)."))
    })
}

fn with_service(f: impl FnOnce(&mut Service) -> Result<String, String>) -> TaskListResponse {
    let mut guard = match lock_service() {
        Ok(guard) => guard,
        Err(message) => return failure_without_state(message),
    };
    let service = &mut *guard;
    let (ok, message) = match f(service) {
        Ok(message) => (true, message),
        Err(message) => (false, message),
    };
    build_response(service, ok, message)
}

fn lock_service() -> Result<MutexGuard<'static, Service>, String> {
    let service = SERVICE
        .get_or_init(|| hydrate_service(&StorageConfig::from_env()).map(Mutex::new))
        .as_ref()
        .map_err(Clone::clone)?;
    // Poisoning is ignored; the list is never left half-mutated.
    Ok(service
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner()))
}

fn hydrate_service(config: &StorageConfig) -> Result<Service, String> {
    match open_service(config) {
        Ok(service) => Ok(service),
        Err(err) => {
            warn!(
                "event=service_open module=ffi status=fallback mode=memory db_path={} error={}",
                config.db_path.display(),
                err
            );
            open_in_memory_service(config.storage_key.as_str()).map_err(|err| {
                error!("event=service_open module=ffi status=error error={err}");
                format!("task storage unavailable: {err}")
            })
        }
    }
}

fn build_response(service: &Service, ok: bool, message: String) -> TaskListResponse {
    let items = service
        .visible_entries()
        .into_iter()
        .map(|entry| TaskItem {
            position: to_wire_count(entry.position),
            id: entry.task.id,
            title: entry.task.title.clone(),
            completed: entry.task.completed,
            editing: entry.task.editing,
        })
        .collect();
    TaskListResponse {
        ok,
        message,
        items,
        filter: service.filter().as_str().to_string(),
        pending_count: to_wire_count(service.pending_count()),
        completed_count: to_wire_count(service.completed_count()),
    }
}

fn failure_without_state(message: String) -> TaskListResponse {
    TaskListResponse {
        ok: false,
        message,
        items: Vec::new(),
        filter: FilterMode::default().as_str().to_string(),
        pending_count: 0,
        completed_count: 0,
    }
}

fn applied_message(applied: bool, message: &str) -> String {
    if applied {
        message.to_string()
    } else {
        "No task at that position.".to_string()
    }
}

fn to_index(position: u32) -> usize {
    usize::try_from(position).unwrap_or(usize::MAX)
}

fn to_wire_count(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ping, task_add, task_begin_edit, task_commit_edit,
        task_toggle, tasks_clear_completed, tasks_set_filter, tasks_snapshot, TaskItem,
    };
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tasklist_core::config::DB_PATH_ENV;
    use tempfile::TempDir;

    static TEST_DB_DIR: OnceLock<TempDir> = OnceLock::new();

    /// Points the process-wide service at a scratch database.
    ///
    /// Must run before the first task intent in every test that issues one.
    fn use_scratch_db() {
        TEST_DB_DIR.get_or_init(|| {
            let dir = tempfile::tempdir().expect("scratch dir should be created");
            std::env::set_var(DB_PATH_ENV, dir.path().join("tasklist-test.sqlite3"));
            dir
        });
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn task_add_rejects_padded_titles() {
        use_scratch_db();
        let response = task_add(" padded ".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("whitespace"));
    }

    #[test]
    fn task_flow_uses_reported_positions() {
        use_scratch_db();
        let title = unique_token("ffi-task");
        let added = task_add(title.clone());
        assert!(added.ok, "{}", added.message);

        let position = find_item(&tasks_snapshot().items, &title).position;
        assert!(task_begin_edit(position).ok);
        let renamed = format!("{title}-renamed");
        let committed = task_commit_edit(position, format!("  {renamed}  "));
        assert!(committed.ok, "{}", committed.message);
        assert!(!find_item(&committed.items, &renamed).editing);

        let toggled = task_toggle(position);
        assert!(toggled.ok);
        assert!(find_item(&toggled.items, &renamed).completed);

        let cleared = tasks_clear_completed();
        assert!(cleared.ok);
        assert!(cleared.items.iter().all(|item| !item.completed));
        assert_eq!(cleared.completed_count, 0);
        assert!(cleared.items.iter().all(|item| item.title != renamed));
    }

    #[test]
    fn tasks_set_filter_rejects_unknown_mode() {
        use_scratch_db();
        let response = tasks_set_filter("someday".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("someday"));
    }

    #[test]
    fn task_intents_use_the_scratch_database() {
        use_scratch_db();
        let dir = TEST_DB_DIR.get().expect("scratch dir should be set");

        let title = unique_token("ffi-scratch");
        assert!(task_add(title).ok);
        assert!(dir.path().join("tasklist-test.sqlite3").exists());
    }

    fn find_item<'a>(items: &'a [TaskItem], title: &str) -> &'a TaskItem {
        items
            .iter()
            .find(|item| item.title == title)
            .expect("task should be visible")
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
