//! Repository layer over durable storage.
//!
//! # Responsibility
//! - Define the key/value slot contract used by the persistence bridge.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - A slot write fully replaces the previous value for that key.
//! - Slot values are opaque strings at this layer.

pub mod slot_repo;
