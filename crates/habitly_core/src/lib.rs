//! Core domain logic for Habitly.
//! This crate is the single source of truth for habit list invariants.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod repo;
pub mod service;

pub use auth::gate::{
    evaluate_credentials, AuthDecision, Authenticator, FieldError, FixedCredentialAuthenticator,
    GateResult, Screen, SessionGate,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::habit::{Habit, HabitId, HabitValidationError};
pub use reminder::{
    AuthorizationOptions, CalendarTrigger, NotificationError, NotificationService,
    ReminderRequest, ReminderScheduler,
};
pub use repo::slot_repo::{
    InMemorySlotRepository, RepoError, RepoResult, SlotRepository, SqliteSlotRepository,
    HABITS_SLOT_KEY,
};
pub use service::habit_store::{ChangeKind, HabitStore, StoreEvent, SubscriptionId};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
