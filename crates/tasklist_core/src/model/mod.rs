//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the task record and filter mode shared by store and persistence.
//! - Own the title admission rules used before a task enters the store.
//!
//! # Invariants
//! - Every task is identified by a `TaskId` unique within its store.
//! - Titles admitted through `add` are non-empty, single-line and unpadded.

pub mod task;
pub mod title;
