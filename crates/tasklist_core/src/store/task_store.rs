//! Ordered task sequence with position-based mutations.
//!
//! # Responsibility
//! - Apply add/delete/toggle/edit/clear operations to the task sequence.
//! - Issue unique time-based task ids.
//! - Notify subscribed observers after every applied change.
//!
//! # Invariants
//! - Ids issued by this store are unique among the tasks it holds. They
//!   grow past every id held or issued until `TaskId::MAX` is taken, after
//!   which the nearest free id below the held ones is used.
//! - `set_editing` leaves at most one task with `editing == true`.
//! - Out-of-range positions leave the sequence untouched and notify nobody.

use crate::model::task::{Task, TaskId};
use crate::model::title::trim_title;
use log::{debug, warn};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// Handle returned by [`TaskStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[Task]) + Send>;

/// Task sequence plus its change observers.
#[derive(Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    last_id: Option<TaskId>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl TaskStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with previously persisted tasks.
    ///
    /// Order is kept as given. Later ids are issued above the highest
    /// hydrated id. Duplicate hydrated ids are kept and logged.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let duplicates = duplicate_id_count(&tasks);
        if duplicates > 0 {
            warn!(
                "event=task_hydrate module=store status=duplicate_ids duplicates={} len={}",
                duplicates,
                tasks.len()
            );
        }
        let last_id = tasks.iter().map(|task| task.id).max();
        Self {
            tasks,
            last_id,
            ..Self::default()
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, position: usize) -> Option<&Task> {
        self.tasks.get(position)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// Appends a new pending task and returns its id.
    ///
    /// # Contract
    /// - `title` has already passed `validate_title`; it is stored verbatim.
    pub fn add(&mut self, title: impl Into<String>) -> TaskId {
        let id = self.next_id();
        self.tasks.push(Task::new(id, title));
        debug!(
            "event=task_add module=store status=ok task_id={} len={}",
            id,
            self.tasks.len()
        );
        self.notify();
        id
    }

    /// Removes the task at `position`. Returns `false` when out of range.
    pub fn delete(&mut self, position: usize) -> bool {
        if position >= self.tasks.len() {
            self.log_out_of_range("task_delete", position);
            return false;
        }

        let removed = self.tasks.remove(position);
        debug!(
            "event=task_delete module=store status=ok task_id={} position={}",
            removed.id, position
        );
        self.notify();
        true
    }

    /// Flips `completed` at `position`. Returns `false` when out of range.
    pub fn toggle_completed(&mut self, position: usize) -> bool {
        let Some(task) = self.tasks.get_mut(position) else {
            self.log_out_of_range("task_toggle", position);
            return false;
        };

        task.completed = !task.completed;
        debug!(
            "event=task_toggle module=store status=ok task_id={} completed={}",
            task.id, task.completed
        );
        self.notify();
        true
    }

    /// Marks the task at `position` as the single task being edited.
    ///
    /// Every other task has `editing` cleared. Returns `false` when out of
    /// range, in which case no flag changes.
    pub fn set_editing(&mut self, position: usize) -> bool {
        if position >= self.tasks.len() {
            self.log_out_of_range("task_edit_begin", position);
            return false;
        }

        for (index, task) in self.tasks.iter_mut().enumerate() {
            task.editing = index == position;
        }
        debug!(
            "event=task_edit_begin module=store status=ok position={}",
            position
        );
        self.notify();
        true
    }

    /// Replaces the title at `position` with the trimmed `new_title` and
    /// ends editing for that task.
    ///
    /// The trimmed title is not validated; an empty title is stored as is.
    /// Returns `false` when out of range.
    pub fn commit_edit(&mut self, position: usize, new_title: &str) -> bool {
        let Some(task) = self.tasks.get_mut(position) else {
            self.log_out_of_range("task_edit_commit", position);
            return false;
        };

        task.title = trim_title(new_title).to_string();
        task.editing = false;
        debug!(
            "event=task_edit_commit module=store status=ok task_id={} empty_title={}",
            task.id,
            task.title.is_empty()
        );
        self.notify();
        true
    }

    /// Removes every completed task, keeping the others in order.
    ///
    /// Returns the number of removed tasks; observers are notified only when
    /// it is non-zero.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();
        debug!(
            "event=task_clear_completed module=store status=ok removed={} len={}",
            removed,
            self.tasks.len()
        );
        if removed > 0 {
            self.notify();
        }
        removed
    }

    /// Registers an observer called with the full sequence after each change.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&[Task]) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes an observer. Returns `false` for unknown handles.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&mut self) {
        let tasks = self.tasks.as_slice();
        for (_, listener) in self.listeners.iter_mut() {
            listener(tasks);
        }
    }

    fn next_id(&mut self) -> TaskId {
        let now = now_epoch_ms();
        let next = match self.last_id {
            Some(last) if now <= last => last.checked_add(1),
            _ => Some(now),
        };
        match next {
            Some(id) => {
                self.last_id = Some(id);
                id
            }
            None => self.free_id_below_held(),
        }
    }

    /// Id space above is exhausted; pick the nearest free id below the
    /// lowest held one, scanning up from `TaskId::MIN` if that underflows.
    fn free_id_below_held(&self) -> TaskId {
        let lowest = self.tasks.iter().map(|task| task.id).min();
        if let Some(id) = lowest.and_then(|lowest| lowest.checked_sub(1)) {
            return id;
        }
        let held: HashSet<TaskId> = self.tasks.iter().map(|task| task.id).collect();
        (TaskId::MIN..=TaskId::MAX)
            .find(|id| !held.contains(id))
            .unwrap_or(TaskId::MIN)
    }

    fn log_out_of_range(&self, event: &str, position: usize) {
        debug!(
            "event={} module=store status=skipped reason=out_of_range position={} len={}",
            event,
            position,
            self.tasks.len()
        );
    }
}

fn duplicate_id_count(tasks: &[Task]) -> usize {
    let mut seen = HashSet::with_capacity(tasks.len());
    tasks.iter().filter(|task| !seen.insert(task.id)).count()
}

fn now_epoch_ms() -> TaskId {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| TaskId::try_from(elapsed.as_millis()).unwrap_or(TaskId::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{duplicate_id_count, TaskStore};
    use crate::model::task::Task;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    fn store_with(titles: &[&str]) -> TaskStore {
        let mut store = TaskStore::new();
        for title in titles {
            store.add(*title);
        }
        store
    }

    fn titles(store: &TaskStore) -> Vec<&str> {
        store.tasks().iter().map(|task| task.title.as_str()).collect()
    }

    #[test]
    fn add_appends_pending_task_with_unique_ids() {
        let store = store_with(&["a", "b", "c"]);

        assert_eq!(titles(&store), vec!["a", "b", "c"]);
        assert!(store.tasks().iter().all(|task| !task.completed && !task.editing));

        let ids: HashSet<_> = store.tasks().iter().map(|task| task.id).collect();
        assert_eq!(ids.len(), 3);
        let ordered: Vec<_> = store.tasks().iter().map(|task| task.id).collect();
        assert!(ordered.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn hydrated_store_issues_ids_above_existing_ones() {
        let far_future = i64::MAX - 10;
        let mut store = TaskStore::from_tasks(vec![Task::new(far_future, "old")]);

        let id = store.add("new");
        assert_eq!(id, far_future + 1);
    }

    #[test]
    fn ids_stay_unique_when_the_highest_id_is_taken() {
        let mut store = TaskStore::from_tasks(vec![Task::new(i64::MAX, "old")]);

        let first = store.add("new");
        let second = store.add("newer");
        assert_eq!(first, i64::MAX - 1);
        assert_eq!(second, i64::MAX - 2);

        let ids: HashSet<_> = store.tasks().iter().map(|task| task.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn hydrated_duplicate_ids_are_kept_and_counted() {
        let tasks = vec![Task::new(5, "a"), Task::new(5, "b"), Task::new(6, "c")];
        assert_eq!(duplicate_id_count(&tasks), 1);

        let mut store = TaskStore::from_tasks(tasks);
        assert_eq!(titles(&store), vec!["a", "b", "c"]);

        let id = store.add("d");
        assert!(store.tasks()[..3].iter().all(|task| task.id != id));
    }

    #[test]
    fn commit_edit_trims_bom_but_keeps_next_line() {
        let mut store = store_with(&["a"]);

        assert!(store.commit_edit(0, "\u{feff} renamed \u{feff}"));
        assert_eq!(store.tasks()[0].title, "renamed");

        assert!(store.commit_edit(0, "\u{85}b"));
        assert_eq!(store.tasks()[0].title, "\u{85}b");
    }

    #[test]
    fn delete_removes_in_place_and_ignores_out_of_range() {
        let mut store = store_with(&["a", "b", "c"]);

        assert!(store.delete(1));
        assert_eq!(titles(&store), vec!["a", "c"]);

        assert!(!store.delete(2));
        assert!(!store.delete(usize::MAX));
        assert_eq!(titles(&store), vec!["a", "c"]);
    }

    #[test]
    fn toggle_completed_is_an_involution() {
        let mut store = store_with(&["a", "b"]);
        let before = store.tasks().to_vec();

        assert!(store.toggle_completed(0));
        assert!(store.tasks()[0].completed);
        assert!(!store.tasks()[1].completed);

        assert!(store.toggle_completed(0));
        assert_eq!(store.tasks(), before.as_slice());

        assert!(!store.toggle_completed(5));
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn set_editing_keeps_a_single_editing_task() {
        let mut store = store_with(&["a", "b", "c"]);

        assert!(store.set_editing(0));
        assert!(store.set_editing(2));

        let editing: Vec<_> = store
            .tasks()
            .iter()
            .enumerate()
            .filter(|(_, task)| task.editing)
            .map(|(index, _)| index)
            .collect();
        assert_eq!(editing, vec![2]);

        assert!(!store.set_editing(3));
        assert!(store.tasks()[2].editing);
    }

    #[test]
    fn commit_edit_trims_and_accepts_empty_titles() {
        let mut store = store_with(&["a", "b"]);
        store.set_editing(1);

        assert!(store.commit_edit(1, "  renamed  "));
        assert_eq!(store.tasks()[1].title, "renamed");
        assert!(!store.tasks()[1].editing);

        assert!(store.commit_edit(0, "   "));
        assert_eq!(store.tasks()[0].title, "");

        assert!(!store.commit_edit(9, "ignored"));
        assert_eq!(titles(&store), vec!["", "renamed"]);
    }

    #[test]
    fn commit_edit_leaves_other_editing_flags_alone() {
        let mut store = store_with(&["a", "b"]);
        store.set_editing(0);

        store.commit_edit(1, "b2");
        assert!(store.tasks()[0].editing);
    }

    #[test]
    fn clear_completed_preserves_relative_order() {
        let mut store = store_with(&["a", "b", "c", "d"]);
        store.toggle_completed(1);
        store.toggle_completed(3);

        assert_eq!(store.pending_count(), 2);
        assert_eq!(store.completed_count(), 2);
        assert_eq!(store.clear_completed(), 2);
        assert_eq!(titles(&store), vec!["a", "c"]);
        assert_eq!(store.clear_completed(), 0);
    }

    #[test]
    fn observers_see_each_applied_change_only() {
        let mut store = TaskStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = store.subscribe(move |tasks| {
            sink.lock().expect("listener lock").push(tasks.len());
        });

        store.add("a");
        store.add("b");
        store.delete(7);
        store.clear_completed();
        store.delete(0);
        assert_eq!(*seen.lock().expect("listener lock"), vec![1, 2, 1]);

        assert!(store.unsubscribe(subscription));
        assert!(!store.unsubscribe(subscription));
        store.add("c");
        assert_eq!(seen.lock().expect("listener lock").len(), 3);
    }
}
