//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the whole-value slot access contract used by the habit store.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs surface transport errors; callers decide whether to
//!   propagate or swallow them.

pub mod slot_repo;
