//! Active filter mode and the visible-task projection.

use crate::model::task::{FilterMode, Task};
use log::debug;

/// A task visible under the active filter, with its position in the full
/// sequence.
///
/// Position-based operations must be issued with `position`, not with the
/// index inside the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleTask<'a> {
    pub position: usize,
    pub task: &'a Task,
}

/// Holds the currently selected filter mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSelector {
    mode: FilterMode,
}

impl FilterSelector {
    pub fn new(mode: FilterMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Sets the active mode. Returns whether the mode changed.
    pub fn set_filter(&mut self, mode: FilterMode) -> bool {
        if self.mode == mode {
            return false;
        }
        debug!(
            "event=filter_change module=filter status=ok from={} to={}",
            self.mode, mode
        );
        self.mode = mode;
        true
    }

    /// Tasks matching the active mode, in store order.
    pub fn visible_tasks<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        filter_tasks(tasks, self.mode)
    }

    /// Like [`Self::visible_tasks`], paired with store positions.
    pub fn visible_entries<'a>(&self, tasks: &'a [Task]) -> Vec<VisibleTask<'a>> {
        tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| self.mode.matches(task))
            .map(|(position, task)| VisibleTask { position, task })
            .collect()
    }
}

/// Pure projection of `tasks` under `mode`.
pub fn filter_tasks(tasks: &[Task], mode: FilterMode) -> Vec<&Task> {
    tasks.iter().filter(|task| mode.matches(task)).collect()
}
