//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store mutations, validation and persistence into use-case
//!   level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod persistence_bridge;
pub mod todo_service;
