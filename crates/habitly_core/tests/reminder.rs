use habitly_core::reminder::{
    AuthorizationCompletion, ScheduleCompletion, DAILY_REMINDER_BODY, DAILY_REMINDER_ID,
    DAILY_REMINDER_TITLE,
};
use habitly_core::{
    AuthorizationOptions, CalendarTrigger, NotificationError, NotificationService,
    ReminderRequest, ReminderScheduler,
};
use std::sync::{Arc, Mutex};

/// Notification service that answers permission requests with a fixed reply.
struct FakeNotificationService {
    permission: Result<bool, NotificationError>,
    permission_requests: Mutex<Vec<AuthorizationOptions>>,
    submitted: Mutex<Vec<ReminderRequest>>,
}

impl FakeNotificationService {
    fn new(permission: Result<bool, NotificationError>) -> Arc<Self> {
        Arc::new(Self {
            permission,
            permission_requests: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        })
    }
}

impl NotificationService for FakeNotificationService {
    fn request_authorization(
        &self,
        options: AuthorizationOptions,
        completion: AuthorizationCompletion,
    ) {
        self.permission_requests.lock().unwrap().push(options);
        completion(self.permission.clone());
    }

    fn add_request(&self, request: ReminderRequest, completion: ScheduleCompletion) {
        self.submitted.lock().unwrap().push(request);
        completion(Ok(()));
    }
}

fn as_service(fake: &Arc<FakeNotificationService>) -> Arc<dyn NotificationService> {
    Arc::clone(fake) as Arc<dyn NotificationService>
}

#[test]
fn daily_reminder_is_static_nine_am_calendar_trigger() {
    let request = ReminderRequest::daily_habit_reminder();

    assert_eq!(request.identifier, DAILY_REMINDER_ID);
    assert_eq!(request.title, DAILY_REMINDER_TITLE);
    assert_eq!(request.body, DAILY_REMINDER_BODY);
    assert_eq!(
        request.trigger,
        CalendarTrigger {
            hour: 9,
            minute: 0,
            repeats: true,
        }
    );
}

#[test]
fn granted_permission_submits_one_reminder() {
    let fake = FakeNotificationService::new(Ok(true));
    let mut scheduler = ReminderScheduler::new();

    assert!(scheduler.on_habit_screen_activated(&as_service(&fake)));

    assert_eq!(
        *fake.permission_requests.lock().unwrap(),
        vec![AuthorizationOptions::ALERT_SOUND_BADGE]
    );
    assert_eq!(
        *fake.submitted.lock().unwrap(),
        vec![ReminderRequest::daily_habit_reminder()]
    );
}

#[test]
fn denied_or_failed_permission_submits_nothing() {
    for permission in [
        Ok(false),
        Err(NotificationError("service unavailable".to_string())),
    ] {
        let fake = FakeNotificationService::new(permission);
        let mut scheduler = ReminderScheduler::new();

        scheduler.on_habit_screen_activated(&as_service(&fake));

        assert_eq!(fake.permission_requests.lock().unwrap().len(), 1);
        assert!(fake.submitted.lock().unwrap().is_empty());
    }
}

#[test]
fn only_first_activation_starts_the_sequence() {
    let fake = FakeNotificationService::new(Ok(true));
    let service = as_service(&fake);
    let mut scheduler = ReminderScheduler::new();

    assert!(scheduler.on_habit_screen_activated(&service));
    assert!(!scheduler.on_habit_screen_activated(&service));

    assert_eq!(fake.permission_requests.lock().unwrap().len(), 1);
    assert_eq!(fake.submitted.lock().unwrap().len(), 1);
}

/// Service that holds completions until the test releases them.
#[derive(Default)]
struct DeferredNotificationService {
    pending: Mutex<Vec<AuthorizationCompletion>>,
    submitted: Mutex<Vec<ReminderRequest>>,
}

impl NotificationService for DeferredNotificationService {
    fn request_authorization(
        &self,
        _options: AuthorizationOptions,
        completion: AuthorizationCompletion,
    ) {
        self.pending.lock().unwrap().push(completion);
    }

    fn add_request(&self, request: ReminderRequest, completion: ScheduleCompletion) {
        self.submitted.lock().unwrap().push(request);
        completion(Err(NotificationError("quota".to_string())));
    }
}

#[test]
fn late_permission_reply_still_schedules_from_another_thread() {
    let deferred = Arc::new(DeferredNotificationService::default());
    let service: Arc<dyn NotificationService> = Arc::clone(&deferred) as _;
    let mut scheduler = ReminderScheduler::new();

    scheduler.on_habit_screen_activated(&service);
    assert!(deferred.submitted.lock().unwrap().is_empty());

    let completion = deferred.pending.lock().unwrap().pop().unwrap();
    std::thread::spawn(move || completion(Ok(true)))
        .join()
        .unwrap();

    assert_eq!(deferred.submitted.lock().unwrap().len(), 1);
}
