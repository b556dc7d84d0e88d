use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};

use crate::children::{CalendarEventDraft, ChildDraft, EventType, Gender};
use crate::notifications::reminders::reminder_message;
use crate::notifications::{NotificationRepository, ReminderJob, ReminderReport};
use crate::testing::TestApp;

fn child_draft() -> ChildDraft {
    ChildDraft {
        name: "Lucia".to_string(),
        second_name: None,
        birth_date: NaiveDate::from_ymd_opt(2024, 3, 10).expect("date"),
        gender: Gender::Female,
        weight: None,
        height: None,
        desc: None,
        image_url: None,
    }
}

fn event(title: &str, date: NaiveDate, has_reminder: bool) -> CalendarEventDraft {
    CalendarEventDraft {
        title: title.to_string(),
        event_type: EventType::Doctor,
        date,
        time: NaiveTime::from_hms_opt(9, 5, 0),
        location: None,
        description: None,
        has_reminder,
        reminder_minutes: None,
    }
}

#[test]
fn sweep_notifies_owners_once_per_day() {
    let app = TestApp::new();
    let parent = app.user("ana");
    let today = Utc::now().date_naive();
    let tomorrow = today + Duration::days(1);
    let child = app
        .context
        .children
        .create(parent.id, child_draft(), today)
        .expect("child");
    for draft in [
        event("Pediatrician", tomorrow, true),
        event("Swim class", tomorrow, false),
        event("Dentist", today + Duration::days(3), true),
    ] {
        app.context
            .children
            .add_event(parent.id, child.id, draft)
            .expect("event");
    }

    let store = Arc::new(app.store.clone());
    let job = ReminderJob::new(store.clone(), store.clone(), store.clone());

    let preview = job.run(today, 1, true).expect("dry run");
    assert_eq!(
        preview,
        ReminderReport {
            scanned: 1,
            created: 1,
            skipped: 0
        }
    );
    assert!(store.for_user(parent.id).expect("inbox").is_empty());

    let report = job.run(today, 1, false).expect("sweep");
    assert_eq!(report.created, 1);
    let inbox = store.for_user(parent.id).expect("inbox");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].title, "Reminder: Pediatrician");
    assert!(inbox[0].message.ends_with("at 09:05: Pediatrician for Lucia"));

    let again = job.run(today, 1, false).expect("second sweep");
    assert_eq!((again.created, again.skipped), (0, 1));
}

#[test]
fn message_defaults_to_midnight_without_a_time() {
    let app = TestApp::new();
    let parent = app.user("ana");
    let today = Utc::now().date_naive();
    let child = app
        .context
        .children
        .create(parent.id, child_draft(), today)
        .expect("child");
    let mut draft = event("Feeding check", NaiveDate::from_ymd_opt(2025, 2, 3).expect("date"), true);
    draft.time = None;
    let stored = app
        .context
        .children
        .add_event(parent.id, child.id, draft)
        .expect("event");

    assert_eq!(
        reminder_message(&stored, "Lucia", 1),
        "Tomorrow 2025-02-03 at 00:00: Feeding check for Lucia"
    );
    assert_eq!(
        reminder_message(&stored, "Lucia", 0),
        "Today 2025-02-03 at 00:00: Feeding check for Lucia"
    );
    assert_eq!(
        reminder_message(&stored, "Lucia", 3),
        "In 3 days, 2025-02-03 at 00:00: Feeding check for Lucia"
    );
}

#[test]
fn dry_run_counts_match_a_real_sweep() {
    let app = TestApp::new();
    let parent = app.user("ana");
    let today = Utc::now().date_naive();
    let in_three_days = today + Duration::days(3);
    let children = &app.context.children;
    let first = children
        .create(parent.id, child_draft(), today)
        .expect("child");
    let mut twin = child_draft();
    twin.name = "Marco".to_string();
    let second = children.create(parent.id, twin, today).expect("twin");
    for child in [first.id, second.id] {
        children
            .add_event(parent.id, child, event("Hearing test", in_three_days, true))
            .expect("event");
    }

    let store = Arc::new(app.store.clone());
    let job = ReminderJob::new(store.clone(), store.clone(), store.clone());

    let preview = job.run(today, 3, true).expect("dry run");
    let report = job.run(today, 3, false).expect("sweep");
    assert_eq!(preview, report);
    assert_eq!((report.scanned, report.created, report.skipped), (2, 1, 1));

    let inbox = store.for_user(parent.id).expect("inbox");
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0].message.starts_with("In 3 days, "));
}

#[test]
fn huge_look_ahead_is_clamped() {
    let app = TestApp::new();
    let store = Arc::new(app.store.clone());
    let job = ReminderJob::new(store.clone(), store.clone(), store);

    let report = job
        .run(Utc::now().date_naive(), i64::MAX, false)
        .expect("sweep");
    assert_eq!(report, ReminderReport::default());
}
