use std::sync::Arc;

use super::domain::{Notification, UnreadCount};
use super::repository::NotificationRepository;
use crate::ids::{NotificationId, UserId};
use crate::storage::RepositoryError;

/// In-app notification inbox.
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    pub fn notify(
        &self,
        user: UserId,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Notification, NotificationError> {
        Ok(self
            .repository
            .insert(Notification::new(user, title, message))?)
    }

    pub fn list(&self, user: UserId) -> Result<Vec<Notification>, NotificationError> {
        Ok(self.repository.for_user(user)?)
    }

    pub fn unread_count(&self, user: UserId) -> Result<UnreadCount, NotificationError> {
        let unread = self
            .repository
            .for_user(user)?
            .iter()
            .filter(|notification| !notification.read)
            .count();
        Ok(UnreadCount { unread })
    }

    /// Notifications belonging to someone else are reported as missing.
    pub fn mark_read(
        &self,
        user: UserId,
        id: NotificationId,
    ) -> Result<Notification, NotificationError> {
        let mut notification = self
            .repository
            .fetch(id)?
            .filter(|notification| notification.user_id == user)
            .ok_or(NotificationError::NotFound)?;
        if !notification.read {
            notification.read = true;
            self.repository.update(notification.clone())?;
        }
        Ok(notification)
    }

    pub fn mark_all_read(&self, user: UserId) -> Result<usize, NotificationError> {
        let mut updated = 0;
        for mut notification in self.repository.for_user(user)? {
            if notification.read {
                continue;
            }
            notification.read = true;
            self.repository.update(notification)?;
            updated += 1;
        }
        Ok(updated)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
