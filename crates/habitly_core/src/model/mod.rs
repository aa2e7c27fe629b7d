//! Domain model for the habit list.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every habit is identified by a stable `HabitId`.
//! - Deletion is a hard removal from the collection; no tombstones.

pub mod habit;
