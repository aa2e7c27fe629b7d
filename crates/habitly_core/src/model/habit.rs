//! Habit domain model.
//!
//! # Responsibility
//! - Define the single record tracked by the habit list.
//! - Enforce record-level invariants at construction and decode time.
//!
//! # Invariants
//! - `id` is a non-nil UUID, generated once and never reused.
//! - `name` is never empty; it is not trimmed, so whitespace-only names
//!   are valid.
//! - `name` is immutable after creation; only `is_completed` changes.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one habit.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type HabitId = Uuid;

/// Record-level validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitValidationError {
    NilId,
    EmptyName,
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "habit id must not be nil"),
            Self::EmptyName => write!(f, "habit name must not be empty"),
        }
    }
}

impl Error for HabitValidationError {}

/// One user-defined habit.
///
/// Wire shape is `{"id": "<uuid>", "name": "...", "isCompleted": bool}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HabitWire")]
pub struct Habit {
    id: HabitId,
    name: String,
    #[serde(rename = "isCompleted")]
    is_completed: bool,
}

#[derive(Deserialize)]
struct HabitWire {
    id: HabitId,
    name: String,
    #[serde(rename = "isCompleted")]
    is_completed: bool,
}

impl TryFrom<HabitWire> for Habit {
    type Error = HabitValidationError;

    fn try_from(wire: HabitWire) -> Result<Self, Self::Error> {
        let mut habit = Self::with_id(wire.id, wire.name)?;
        habit.is_completed = wire.is_completed;
        Ok(habit)
    }
}

impl Habit {
    /// Creates an incomplete habit with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Result<Self, HabitValidationError> {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates an incomplete habit with a caller-provided id.
    ///
    /// Used when decoding persisted records whose identity already exists.
    pub fn with_id(id: HabitId, name: impl Into<String>) -> Result<Self, HabitValidationError> {
        let habit = Self {
            id,
            name: name.into(),
            is_completed: false,
        };
        habit.validate()?;
        Ok(habit)
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        if self.id.is_nil() {
            return Err(HabitValidationError::NilId);
        }
        if self.name.is_empty() {
            return Err(HabitValidationError::EmptyName);
        }
        Ok(())
    }

    pub fn id(&self) -> HabitId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Flips the completion flag and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.is_completed = !self.is_completed;
        self.is_completed
    }
}
