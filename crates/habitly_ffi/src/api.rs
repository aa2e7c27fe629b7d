//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Hold the process-wide session gate and habit store between calls.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Habit operations are refused until the gate has authenticated.
//! - The store is opened and loaded once per process, on first activation.

use habitly_core::db::open_db;
use habitly_core::reminder::{log_authorization_outcome, log_schedule_outcome};
use habitly_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    FixedCredentialAuthenticator, Habit, HabitStore, NotificationError, ReminderRequest, Screen,
    SessionGate, SqliteSlotRepository,
};
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};
use uuid::Uuid;

const DB_FILE_NAME: &str = "habitly.sqlite3";
const DB_PATH_ENV: &str = "HABITLY_DB_PATH";
static APP_STATE: OnceLock<Mutex<AppState>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Login form response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    /// Whether the app should switch to the habit screen.
    pub authenticated: bool,
    /// Inline error under the username field.
    pub username_error: Option<String>,
    /// Inline error under the password field.
    pub password_error: Option<String>,
    /// Generic rejection banner.
    pub banner: Option<String>,
}

/// One row of the habit list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitItem {
    pub id: String,
    pub name: String,
    pub is_completed: bool,
}

/// Habit list envelope returned by every habit operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitListResponse {
    /// Whether the call reached the store.
    pub ok: bool,
    /// Full list after the operation, in display order.
    pub items: Vec<HabitItem>,
    /// True only on the first activation of the process; the shell should
    /// then request notification permission and submit `reminder_request()`.
    pub schedule_reminder: bool,
    /// Human-readable diagnostics.
    pub message: String,
}

impl HabitListResponse {
    fn success(habits: &[Habit], message: impl Into<String>) -> Self {
        Self {
            ok: true,
            items: habits.iter().map(to_habit_item).collect(),
            schedule_reminder: false,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            schedule_reminder: false,
            message: message.into(),
        }
    }
}

/// Daily reminder description for the platform notification service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSpec {
    pub identifier: String,
    pub title: String,
    pub body: String,
    pub hour: u8,
    pub minute: u8,
    pub repeats: bool,
}

/// Checks credentials and, on success, unlocks habit operations.
#[flutter_rust_bridge::frb(sync)]
pub fn login(username: String, password: String) -> LoginResponse {
    with_app_state(|app| app.login(&username, &password))
}

/// Locks habit operations again; the loaded list stays in memory.
#[flutter_rust_bridge::frb(sync)]
pub fn logout() {
    with_app_state(AppState::logout)
}

/// Loads the persisted list when the habit screen becomes active.
#[flutter_rust_bridge::frb(sync)]
pub fn habits_activate() -> HabitListResponse {
    with_app_state(AppState::activate)
}

/// Appends one habit; empty names are ignored.
#[flutter_rust_bridge::frb(sync)]
pub fn habits_add(name: String) -> HabitListResponse {
    with_app_state(|app| app.add(name))
}

/// Flips completion of the habit with `habit_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn habits_toggle(habit_id: String) -> HabitListResponse {
    with_app_state(|app| app.toggle(&habit_id))
}

/// Deletes habits by their current list positions.
#[flutter_rust_bridge::frb(sync)]
pub fn habits_delete(positions: Vec<u32>) -> HabitListResponse {
    with_app_state(|app| app.delete(&positions))
}

/// Returns the static daily reminder to submit.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_request() -> ReminderSpec {
    let request = ReminderRequest::daily_habit_reminder();
    ReminderSpec {
        identifier: request.identifier,
        title: request.title,
        body: request.body,
        hour: request.trigger.hour,
        minute: request.trigger.minute,
        repeats: request.trigger.repeats,
    }
}

/// Records the platform permission reply. Logging only.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_report_permission(granted: bool, error: Option<String>) {
    let result = match error {
        Some(message) => Err(NotificationError(message)),
        None => Ok(granted),
    };
    log_authorization_outcome(&result);
}

/// Records the platform scheduling reply. Logging only.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_report_schedule(error: Option<String>) {
    let result = match error {
        Some(message) => Err(NotificationError(message)),
        None => Ok(()),
    };
    log_schedule_outcome(&result);
}

struct AppState {
    gate: SessionGate<FixedCredentialAuthenticator>,
    db_path: PathBuf,
    store: Option<HabitStore<SqliteSlotRepository>>,
    reminder_started: bool,
}

impl AppState {
    fn new(db_path: PathBuf) -> Self {
        Self {
            gate: SessionGate::default(),
            db_path,
            store: None,
            reminder_started: false,
        }
    }

    fn login(&mut self, username: &str, password: &str) -> LoginResponse {
        let result = self.gate.attempt_login(username, password);
        LoginResponse {
            authenticated: result.is_authenticated(),
            username_error: result.username_error.map(|err| err.message().to_string()),
            password_error: result.password_error.map(|err| err.message().to_string()),
            banner: result.banner().map(str::to_string),
        }
    }

    fn logout(&mut self) {
        self.gate.sign_out();
    }

    fn activate(&mut self) -> HabitListResponse {
        if self.gate.screen() != Screen::Habits {
            return HabitListResponse::failure("habits_activate failed: login required");
        }
        let store = match self.store.take() {
            Some(store) => store,
            None => match open_store(&self.db_path) {
                Ok(store) => store,
                Err(message) => {
                    return HabitListResponse::failure(format!("habits_activate failed: {message}"))
                }
            },
        };
        let store = self.store.insert(store);
        let habits = store.load();

        let mut response = HabitListResponse::success(habits, "Habits loaded.");
        response.schedule_reminder = !self.reminder_started;
        self.reminder_started = true;
        response
    }

    fn add(&mut self, name: String) -> HabitListResponse {
        self.with_store("habits_add", |store| {
            let message = match store.add(name) {
                Some(_) => "Habit added.",
                None => "Empty name ignored.",
            };
            HabitListResponse::success(store.habits(), message)
        })
    }

    fn toggle(&mut self, habit_id: &str) -> HabitListResponse {
        let id = match Uuid::parse_str(habit_id.trim()) {
            Ok(id) => id,
            Err(_) => {
                return HabitListResponse::failure(format!(
                    "habits_toggle failed: invalid habit id `{habit_id}`"
                ))
            }
        };
        self.with_store("habits_toggle", |store| {
            let message = if store.toggle_completion(id) {
                "Habit updated."
            } else {
                "Habit not found."
            };
            HabitListResponse::success(store.habits(), message)
        })
    }

    fn delete(&mut self, positions: &[u32]) -> HabitListResponse {
        self.with_store("habits_delete", |store| {
            let removed = store.delete(positions.iter().map(|position| *position as usize));
            HabitListResponse::success(store.habits(), format!("Deleted {removed} habit(s)."))
        })
    }

    fn with_store(
        &mut self,
        operation: &str,
        f: impl FnOnce(&mut HabitStore<SqliteSlotRepository>) -> HabitListResponse,
    ) -> HabitListResponse {
        if self.gate.screen() != Screen::Habits {
            return HabitListResponse::failure(format!("{operation} failed: login required"));
        }
        match self.store.as_mut() {
            Some(store) => f(store),
            None => HabitListResponse::failure(format!(
                "{operation} failed: habit screen not activated"
            )),
        }
    }
}

fn open_store(db_path: &Path) -> Result<HabitStore<SqliteSlotRepository>, String> {
    let conn = open_db(db_path).map_err(|err| format!("habit DB open failed: {err}"))?;
    let repo =
        SqliteSlotRepository::try_new(conn).map_err(|err| format!("slot repo init failed: {err}"))?;
    Ok(HabitStore::new(repo))
}

fn with_app_state<T>(f: impl FnOnce(&mut AppState) -> T) -> T {
    let state = APP_STATE.get_or_init(|| Mutex::new(AppState::new(resolve_db_path())));
    let mut guard = state.lock().unwrap_or_else(|poisoned| {
        warn!("event=app_state_lock module=ffi status=recovered");
        PoisonError::into_inner(poisoned)
    });
    f(&mut guard)
}

fn resolve_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DB_FILE_NAME)
}

fn to_habit_item(habit: &Habit) -> HabitItem {
    HabitItem {
        id: habit.id().to_string(),
        name: habit.name().to_string(),
        is_completed: habit.is_completed(),
    }
}
