//! Daily reminder scheduling glue.
//!
//! # Responsibility
//! - Describe the one static daily reminder the app posts.
//! - Ask the OS notification service for permission and submit the
//!   reminder once per process, on first habit-screen activation.
//!
//! # Invariants
//! - Completions only log; they never feed back into app state.
//! - The reminder is keyed by a fixed identifier so resubmission replaces
//!   the previous request instead of duplicating it.
//! - Reminder content is static and never reflects habit data.

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub const DAILY_REMINDER_ID: &str = "daily_habit_reminder";
pub const DAILY_REMINDER_TITLE: &str = "Habit Reminder";
pub const DAILY_REMINDER_BODY: &str = "Don't forget to check off your habits today!";
pub const DAILY_REMINDER_HOUR: u8 = 9;
pub const DAILY_REMINDER_MINUTE: u8 = 0;

/// Presentation permissions requested from the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationOptions {
    pub alert: bool,
    pub sound: bool,
    pub badge: bool,
}

impl AuthorizationOptions {
    pub const ALERT_SOUND_BADGE: Self = Self {
        alert: true,
        sound: true,
        badge: true,
    };
}

/// Wall-clock trigger in the device's local time zone.
///
/// Calendar-based: it fires at `hour:minute` each day, not after a fixed
/// elapsed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarTrigger {
    pub hour: u8,
    pub minute: u8,
    pub repeats: bool,
}

/// One reminder submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub identifier: String,
    pub title: String,
    pub body: String,
    pub trigger: CalendarTrigger,
}

impl ReminderRequest {
    /// The 09:00 daily habit reminder.
    pub fn daily_habit_reminder() -> Self {
        Self {
            identifier: DAILY_REMINDER_ID.to_string(),
            title: DAILY_REMINDER_TITLE.to_string(),
            body: DAILY_REMINDER_BODY.to_string(),
            trigger: CalendarTrigger {
                hour: DAILY_REMINDER_HOUR,
                minute: DAILY_REMINDER_MINUTE,
                repeats: true,
            },
        }
    }
}

/// Failure reported by the platform notification service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationError(pub String);

impl Display for NotificationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "notification service error: {}", self.0)
    }
}

impl Error for NotificationError {}

/// Completion for a permission request; `Ok(false)` means denied.
pub type AuthorizationCompletion = Box<dyn FnOnce(Result<bool, NotificationError>) + Send>;
/// Completion for a reminder submission.
pub type ScheduleCompletion = Box<dyn FnOnce(Result<(), NotificationError>) + Send>;

/// OS notification service seam.
///
/// Implementations may call completions on any thread, at any time.
pub trait NotificationService: Send + Sync {
    fn request_authorization(
        &self,
        options: AuthorizationOptions,
        completion: AuthorizationCompletion,
    );
    fn add_request(&self, request: ReminderRequest, completion: ScheduleCompletion);
}

/// Fires the permission + schedule sequence once per process.
#[derive(Debug, Default)]
pub struct ReminderScheduler {
    activated: bool,
}

impl ReminderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the reminder sequence on first call; later calls are ignored.
    ///
    /// Returns whether this call started the sequence.
    pub fn on_habit_screen_activated(&mut self, service: &Arc<dyn NotificationService>) -> bool {
        if self.activated {
            return false;
        }
        self.activated = true;

        let scheduler_service = Arc::clone(service);
        service.request_authorization(
            AuthorizationOptions::ALERT_SOUND_BADGE,
            Box::new(move |result| {
                log_authorization_outcome(&result);
                if matches!(result, Ok(true)) {
                    scheduler_service.add_request(
                        ReminderRequest::daily_habit_reminder(),
                        Box::new(|result| log_schedule_outcome(&result)),
                    );
                }
            }),
        );
        true
    }
}

/// Logs the permission outcome. Denial is not an error for the app.
pub fn log_authorization_outcome(result: &Result<bool, NotificationError>) {
    match result {
        Ok(true) => info!("event=notification_permission module=reminder status=granted"),
        Ok(false) => info!("event=notification_permission module=reminder status=denied"),
        Err(err) => warn!(
            "event=notification_permission module=reminder status=error error={}",
            err
        ),
    }
}

/// Logs the reminder submission outcome.
pub fn log_schedule_outcome(result: &Result<(), NotificationError>) {
    match result {
        Ok(()) => info!(
            "event=reminder_schedule module=reminder status=ok id={} hour={} minute={}",
            DAILY_REMINDER_ID, DAILY_REMINDER_HOUR, DAILY_REMINDER_MINUTE
        ),
        Err(err) => warn!(
            "event=reminder_schedule module=reminder status=error id={} error={}",
            DAILY_REMINDER_ID, err
        ),
    }
}
