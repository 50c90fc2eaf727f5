//! In-memory task state.
//!
//! # Responsibility
//! - Hold the ordered task sequence and apply position-based mutations.
//! - Derive the visible subset for the active filter mode.
//!
//! # Invariants
//! - Order is insertion order; no operation reorders tasks.
//! - Out-of-range positions are no-ops, never errors.
//! - The visible subset is recomputed from (tasks, mode) on every read.

pub mod filter;
pub mod task_store;
