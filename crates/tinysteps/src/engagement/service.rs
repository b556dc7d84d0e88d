use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::domain::{Comment, ContentKind, ContentRef, EngagementCounts, LikeToggle};
use super::repository::{ContentResolver, EngagementRepository};
use crate::accounts::User;
use crate::ids::CommentId;
use crate::storage::RepositoryError;
use crate::validation::{self, FieldError};

pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Comments and likes attached to forum posts and guides.
pub struct EngagementService {
    repository: Arc<dyn EngagementRepository>,
    resolver: Arc<dyn ContentResolver>,
}

impl EngagementService {
    pub fn new(
        repository: Arc<dyn EngagementRepository>,
        resolver: Arc<dyn ContentResolver>,
    ) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    /// Resolves the loose `content_type` string used by the generic endpoint.
    pub fn target_from(&self, content_type: &str, object_id: u64) -> Result<ContentRef, EngagementError> {
        let kind = ContentKind::parse(content_type)
            .ok_or_else(|| EngagementError::UnsupportedContentType(content_type.to_string()))?;
        Ok(ContentRef { kind, object_id })
    }

    pub fn add_comment(
        &self,
        author: &User,
        target: ContentRef,
        text: &str,
    ) -> Result<Comment, EngagementError> {
        let text = validation::bounded_text("text", text, 1, MAX_COMMENT_LENGTH)?;
        self.ensure_exists(target)?;

        let comment = self.repository.insert_comment(Comment {
            id: CommentId::UNASSIGNED,
            target,
            author: author.id,
            author_name: author.username.clone(),
            text,
            created_at: Utc::now(),
        })?;
        debug!(comment_id = %comment.id, %target, "comment added");
        Ok(comment)
    }

    pub fn comments(&self, target: ContentRef) -> Result<Vec<Comment>, EngagementError> {
        Ok(self.repository.comments_on(target)?)
    }

    /// Authors may remove their own comments; staff may remove any.
    pub fn delete_comment(&self, requester: &User, id: CommentId) -> Result<(), EngagementError> {
        let comment = self
            .repository
            .fetch_comment(id)?
            .ok_or(EngagementError::CommentNotFound)?;
        if comment.author != requester.id && !requester.is_staff {
            return Err(EngagementError::Forbidden);
        }
        self.repository.delete_comment(id)?;
        info!(comment_id = %id, deleted_by = %requester.id, "comment deleted");
        Ok(())
    }

    pub fn toggle_like(&self, user: &User, target: ContentRef) -> Result<LikeToggle, EngagementError> {
        if !target.kind.is_likeable() {
            return Err(EngagementError::NotLikeable);
        }
        self.ensure_exists(target)?;
        let liked = self.repository.toggle_like(target, user.id, Utc::now())?;
        Ok(LikeToggle {
            liked,
            likes_count: self.repository.like_count(target)?,
        })
    }

    pub fn has_liked(&self, user: &User, target: ContentRef) -> Result<bool, EngagementError> {
        Ok(self.repository.has_liked(target, user.id)?)
    }

    pub fn counts(&self, target: ContentRef) -> Result<EngagementCounts, EngagementError> {
        Ok(EngagementCounts {
            comments_count: self.repository.comment_count(target)?,
            likes_count: self.repository.like_count(target)?,
        })
    }

    pub fn purge(&self, target: ContentRef) -> Result<(), EngagementError> {
        self.repository.purge(target)?;
        debug!(%target, "engagement purged");
        Ok(())
    }

    fn ensure_exists(&self, target: ContentRef) -> Result<(), EngagementError> {
        if self.resolver.content_exists(target)? {
            Ok(())
        } else {
            Err(EngagementError::TargetNotFound(target))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngagementError {
    #[error(transparent)]
    Invalid(#[from] FieldError),
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("content {0} does not exist")]
    TargetNotFound(ContentRef),
    #[error("comment not found")]
    CommentNotFound,
    #[error("only forum posts can be liked")]
    NotLikeable,
    #[error("you can only delete your own comments")]
    Forbidden,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
