use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::Notification;
use super::repository::NotificationRepository;
use crate::children::{CalendarEvent, CalendarRepository, ChildRepository};
use crate::ids::UserId;
use crate::storage::RepositoryError;
use crate::validation;

/// Outcome of one reminder sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderReport {
    pub scanned: usize,
    pub created: usize,
    pub skipped: usize,
}

/// Turns reminder-enabled calendar events into inbox notifications.
pub struct ReminderJob {
    children: Arc<dyn ChildRepository>,
    calendar: Arc<dyn CalendarRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl ReminderJob {
    pub fn new(
        children: Arc<dyn ChildRepository>,
        calendar: Arc<dyn CalendarRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            children,
            calendar,
            notifications,
        }
    }

    /// Notifies owners about events dated `today + days_ahead`.
    ///
    /// An owner who already received a notification mentioning the event title
    /// today, or earlier in this sweep, is skipped, so running the job twice is
    /// harmless. With `dry_run` nothing is written and `created` counts what
    /// would have been sent. `days_ahead` is clamped to `0..=MAX_WINDOW_DAYS`.
    pub fn run(
        &self,
        today: NaiveDate,
        days_ahead: i64,
        dry_run: bool,
    ) -> Result<ReminderReport, RepositoryError> {
        let window = validation::window_days(days_ahead);
        let target = today + window;
        let events = self.calendar.reminders_on(target)?;
        let mut counted: HashSet<(UserId, String)> = HashSet::new();
        let mut report = ReminderReport {
            scanned: events.len(),
            ..ReminderReport::default()
        };

        for event in events {
            let Some(child) = self.children.fetch_child(event.child_id)? else {
                warn!(event_id = %event.id, "reminder event without a child");
                report.skipped += 1;
                continue;
            };

            if counted.contains(&(child.owner, event.title.clone()))
                || self.notifications.exists_on(child.owner, &event.title, today)?
            {
                debug!(event_id = %event.id, user_id = %child.owner, "reminder already sent");
                report.skipped += 1;
                continue;
            }

            if !dry_run {
                self.notifications.insert(Notification::new(
                    child.owner,
                    format!("Reminder: {}", event.title),
                    reminder_message(&event, &child.name, window.num_days()),
                ))?;
            }
            counted.insert((child.owner, event.title.clone()));
            report.created += 1;
        }

        info!(
            target_date = %target,
            scanned = report.scanned,
            created = report.created,
            skipped = report.skipped,
            dry_run,
            "reminder sweep finished"
        );
        Ok(report)
    }
}

/// Reminder text for an event `days_ahead` days away.
pub fn reminder_message(event: &CalendarEvent, child_name: &str, days_ahead: i64) -> String {
    let time = event
        .time
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_else(|| "00:00".to_string());
    let when = match days_ahead {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        days => format!("In {days} days,"),
    };
    format!(
        "{} {} at {}: {} for {}",
        when,
        event.date.format("%Y-%m-%d"),
        time,
        event.title,
        child_name
    )
}
