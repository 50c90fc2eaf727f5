//! Task record and filter mode.
//!
//! # Responsibility
//! - Define the canonical task shape persisted to the storage slot.
//! - Define the filter modes used to project visible tasks.
//!
//! # Invariants
//! - `id` is unique within one store and never reused there.
//! - `editing` is a transient UI flag but stays part of the stored shape.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Task identifier, derived from creation time in Unix epoch milliseconds.
pub type TaskId = i64;

/// One to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    /// Older records were written without this flag.
    #[serde(default)]
    pub editing: bool,
}

impl Task {
    /// Creates a pending, non-editing task.
    ///
    /// Does not validate `title`; callers admit titles through
    /// `model::title::validate_title` first.
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
            editing: false,
        }
    }

    /// Returns whether the task is still open.
    pub fn is_pending(&self) -> bool {
        !self.completed
    }
}

/// Subset criterion for the visible task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// Every task.
    #[default]
    All,
    /// Tasks with `completed == false`.
    Pending,
    /// Tasks with `completed == true`.
    Completed,
}

/// String form of [`FilterMode::All`].
pub const FILTER_MODE_ALL: &str = "all";
/// String form of [`FilterMode::Pending`].
pub const FILTER_MODE_PENDING: &str = "pending";
/// String form of [`FilterMode::Completed`].
pub const FILTER_MODE_COMPLETED: &str = "completed";

impl FilterMode {
    /// Stable string id used across the UI boundary.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => FILTER_MODE_ALL,
            Self::Pending => FILTER_MODE_PENDING,
            Self::Completed => FILTER_MODE_COMPLETED,
        }
    }

    /// Returns whether `task` belongs to this mode's subset.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl Display for FilterMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = FilterParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" => Err(FilterParseError::Empty),
            FILTER_MODE_ALL => Ok(Self::All),
            FILTER_MODE_PENDING => Ok(Self::Pending),
            FILTER_MODE_COMPLETED => Ok(Self::Completed),
            other => Err(FilterParseError::Unsupported(other.to_string())),
        }
    }
}

/// Filter mode parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterParseError {
    Empty,
    Unsupported(String),
}

impl Display for FilterParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "filter mode must not be empty"),
            Self::Unsupported(value) => write!(
                f,
                "unsupported filter mode `{value}`; expected all|pending|completed"
            ),
        }
    }
}

impl Error for FilterParseError {}
