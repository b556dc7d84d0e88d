use chrono::{DateTime, Utc};

use super::domain::{Comment, ContentRef};
use crate::ids::{CommentId, UserId};
use crate::storage::RepositoryError;

pub trait EngagementRepository: Send + Sync {
    fn insert_comment(&self, comment: Comment) -> Result<Comment, RepositoryError>;
    fn fetch_comment(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError>;
    fn delete_comment(&self, id: CommentId) -> Result<(), RepositoryError>;
    /// Oldest first.
    fn comments_on(&self, target: ContentRef) -> Result<Vec<Comment>, RepositoryError>;
    fn comment_count(&self, target: ContentRef) -> Result<usize, RepositoryError>;

    /// Adds the like when absent and removes it otherwise; returns whether it is now liked.
    fn toggle_like(
        &self,
        target: ContentRef,
        user: UserId,
        at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;
    fn like_count(&self, target: ContentRef) -> Result<usize, RepositoryError>;
    fn has_liked(&self, target: ContentRef, user: UserId) -> Result<bool, RepositoryError>;

    /// Removes every comment and like attached to `target`.
    fn purge(&self, target: ContentRef) -> Result<(), RepositoryError>;
}

/// Answers whether a comment target exists.
pub trait ContentResolver: Send + Sync {
    fn content_exists(&self, target: ContentRef) -> Result<bool, RepositoryError>;
}
