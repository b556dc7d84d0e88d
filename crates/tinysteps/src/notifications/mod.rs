//! In-app notifications, outbound e-mail and the calendar reminder sweep.

pub mod domain;
pub mod mailer;
pub mod reminders;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Notification, UnreadCount};
pub use mailer::{LogMailer, MailError, MailSettings, Mailer, MemoryMailer, OutgoingEmail};
pub use reminders::{ReminderJob, ReminderReport};
pub use repository::NotificationRepository;
pub use router::notification_router;
pub use service::{NotificationError, NotificationService};
