//! Mirror of the task sequence into a durable slot.
//!
//! # Responsibility
//! - Serialize the full task sequence to JSON and overwrite the slot.
//! - Hydrate the initial sequence from the slot at startup.
//!
//! # Invariants
//! - Every write replaces the whole previous value; there are no partial
//!   updates.
//! - `hydrate` never fails: unreadable or malformed data starts empty.
//! - Task titles are never written to logs.

use crate::model::task::Task;
use crate::repo::slot_repo::{RepoError, SlotRepository};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistResult<T> = Result<T, PersistError>;

/// Failure reading, decoding, encoding or writing the task slot.
#[derive(Debug)]
pub enum PersistError {
    Repo(RepoError),
    /// Task list could not be serialized.
    Encode(serde_json::Error),
    /// Stored value is not a JSON task list.
    Decode(serde_json::Error),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode task list: {err}"),
            Self::Decode(err) => write!(f, "stored task list is malformed: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode(err) | Self::Decode(err) => Some(err),
        }
    }
}

impl From<RepoError> for PersistError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Reads and writes the task list under one fixed slot key.
pub struct PersistenceBridge<R: SlotRepository> {
    repo: R,
    key: String,
}

impl<R: SlotRepository> PersistenceBridge<R> {
    pub fn new(repo: R, key: impl Into<String>) -> Self {
        Self {
            repo,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Strict read of the stored task list.
    ///
    /// Returns `Ok(None)` when the slot was never written.
    pub fn load(&self) -> PersistResult<Option<Vec<Task>>> {
        let Some(raw) = self.repo.read_slot(&self.key)? else {
            return Ok(None);
        };
        let tasks = serde_json::from_str::<Vec<Task>>(&raw).map_err(PersistError::Decode)?;
        Ok(Some(tasks))
    }

    /// Startup read that treats every failure as "no prior state".
    pub fn hydrate(&self) -> Vec<Task> {
        match self.load() {
            Ok(Some(tasks)) => {
                info!(
                    "event=tasks_hydrate module=persist status=ok key={} count={}",
                    self.key,
                    tasks.len()
                );
                tasks
            }
            Ok(None) => {
                info!(
                    "event=tasks_hydrate module=persist status=empty key={}",
                    self.key
                );
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=tasks_hydrate module=persist status=fallback key={} error={}",
                    self.key, err
                );
                Vec::new()
            }
        }
    }

    /// Overwrites the slot with the full task list.
    pub fn mirror(&self, tasks: &[Task]) -> PersistResult<()> {
        let encoded = serde_json::to_string(tasks).map_err(PersistError::Encode)?;
        if let Err(err) = self.repo.write_slot(&self.key, &encoded) {
            error!(
                "event=tasks_mirror module=persist status=error key={} count={} error={}",
                self.key,
                tasks.len(),
                err
            );
            return Err(err.into());
        }
        Ok(())
    }
}
