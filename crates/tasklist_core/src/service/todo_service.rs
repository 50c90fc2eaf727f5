//! To-do list use-case service.
//!
//! # Responsibility
//! - Own the task store, filter selector, input field and persistence bridge
//!   as one explicit state container.
//! - Gate `add` through title validation.
//! - Mirror the store to durable storage after every applied mutation.
//!
//! # Invariants
//! - A mutation is fully applied before its mirror write is issued.
//! - Mirror failures are logged and never undo or block the in-memory change.
//! - Position arguments always address the full store, not a filtered view.

use crate::model::task::{FilterMode, Task, TaskId};
use crate::model::title::{validate_title, TaskInput, TitleValidationError};
use crate::repo::slot_repo::SlotRepository;
use crate::service::persistence_bridge::{PersistResult, PersistenceBridge};
use crate::store::filter::{FilterSelector, VisibleTask};
use crate::store::task_store::{SubscriptionId, TaskStore};
use log::{debug, error};

/// State container driving one to-do list.
pub struct TodoService<R: SlotRepository> {
    store: TaskStore,
    filter: FilterSelector,
    input: TaskInput,
    bridge: PersistenceBridge<R>,
}

impl<R: SlotRepository> TodoService<R> {
    /// Hydrates a service from `repo` under slot `key`.
    ///
    /// Missing or malformed stored data yields an empty list.
    pub fn open(repo: R, key: impl Into<String>) -> Self {
        Self::with_bridge(PersistenceBridge::new(repo, key))
    }

    /// Hydrates a service from an existing bridge.
    pub fn with_bridge(bridge: PersistenceBridge<R>) -> Self {
        let store = TaskStore::from_tasks(bridge.hydrate());
        Self {
            store,
            filter: FilterSelector::default(),
            input: TaskInput::new(),
            bridge,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn bridge(&self) -> &PersistenceBridge<R> {
        &self.bridge
    }

    pub fn into_bridge(self) -> PersistenceBridge<R> {
        self.bridge
    }

    /// Adds a task after validating `title`.
    ///
    /// # Errors
    /// - Returns the validation failure; the store is left unchanged.
    pub fn add_task(&mut self, title: &str) -> Result<TaskId, TitleValidationError> {
        if let Err(err) = validate_title(title) {
            debug!(
                "event=task_add module=service status=rejected reason={:?}",
                err
            );
            return Err(err);
        }
        let id = self.store.add(title);
        self.mirror();
        Ok(id)
    }

    /// Current text of the new-task input field.
    pub fn input(&self) -> &TaskInput {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input.set_value(value);
    }

    /// Adds the input field text as a task and clears the field.
    ///
    /// # Errors
    /// - Returns the validation failure; the store and field are unchanged.
    pub fn submit_input(&mut self) -> Result<TaskId, TitleValidationError> {
        let title = self.input.value().to_string();
        let id = self.add_task(&title)?;
        self.input.clear();
        Ok(id)
    }

    /// Deletes the task at `position`; out-of-range positions are a no-op.
    pub fn delete_task(&mut self, position: usize) -> bool {
        self.apply(|store| store.delete(position))
    }

    /// Flips completion at `position`; out-of-range positions are a no-op.
    pub fn toggle_completed(&mut self, position: usize) -> bool {
        self.apply(|store| store.toggle_completed(position))
    }

    /// Starts editing the task at `position`, ending any other edit.
    pub fn begin_edit(&mut self, position: usize) -> bool {
        self.apply(|store| store.set_editing(position))
    }

    /// Commits an edit with the trimmed `new_title` and clears the input
    /// field.
    ///
    /// The trimmed title is stored without validation, so it may be empty.
    pub fn commit_edit(&mut self, position: usize, new_title: &str) -> bool {
        let applied = self.apply(|store| store.commit_edit(position, new_title));
        self.input.clear();
        applied
    }

    /// Removes every completed task. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let removed = self.store.clear_completed();
        if removed > 0 {
            self.mirror();
        }
        removed
    }

    pub fn filter(&self) -> FilterMode {
        self.filter.mode()
    }

    pub fn set_filter(&mut self, mode: FilterMode) -> bool {
        self.filter.set_filter(mode)
    }

    /// Tasks matching the active filter, in store order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.filter.visible_tasks(self.store.tasks())
    }

    /// Visible tasks paired with their store positions.
    pub fn visible_entries(&self) -> Vec<VisibleTask<'_>> {
        self.filter.visible_entries(self.store.tasks())
    }

    pub fn pending_count(&self) -> usize {
        self.store.pending_count()
    }

    pub fn completed_count(&self) -> usize {
        self.store.completed_count()
    }

    /// Registers an observer called after every applied store change.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&[Task]) + Send + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Writes the current list to storage and reports failures to the caller.
    pub fn flush(&self) -> PersistResult<()> {
        self.bridge.mirror(self.store.tasks())
    }

    fn apply(&mut self, mutation: impl FnOnce(&mut TaskStore) -> bool) -> bool {
        let applied = mutation(&mut self.store);
        if applied {
            self.mirror();
        }
        applied
    }

    fn mirror(&self) {
        if let Err(err) = self.bridge.mirror(self.store.tasks()) {
            error!(
                "event=tasks_mirror module=service status=degraded mode=in_memory error={}",
                err
            );
        }
    }
}
