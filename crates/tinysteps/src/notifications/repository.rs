use chrono::NaiveDate;

use super::domain::Notification;
use crate::ids::{NotificationId, UserId};
use crate::storage::RepositoryError;

pub trait NotificationRepository: Send + Sync {
    fn insert(&self, notification: Notification) -> Result<Notification, RepositoryError>;
    fn update(&self, notification: Notification) -> Result<(), RepositoryError>;
    fn fetch(&self, id: NotificationId) -> Result<Option<Notification>, RepositoryError>;
    /// Notifications addressed to `user`, newest first.
    fn for_user(&self, user: UserId) -> Result<Vec<Notification>, RepositoryError>;
    /// Whether `user` already received a notification on `day` whose title contains `fragment`.
    fn exists_on(
        &self,
        user: UserId,
        fragment: &str,
        day: NaiveDate,
    ) -> Result<bool, RepositoryError>;
}
