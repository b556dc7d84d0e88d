use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CommentId, GuideId, PostId, UserId};

/// Kinds of content that can carry comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    ForumPost,
    #[serde(alias = "parent_guide", alias = "nutrition_guide")]
    Guide,
}

impl ContentKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "forum_post" => Some(Self::ForumPost),
            "guide" | "parent_guide" | "nutrition_guide" => Some(Self::Guide),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ForumPost => "forum_post",
            Self::Guide => "guide",
        }
    }

    /// Only forum posts collect likes.
    pub const fn is_likeable(self) -> bool {
        matches!(self, Self::ForumPost)
    }
}

/// Content-type and object-id pair that comments and likes point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentRef {
    pub kind: ContentKind,
    pub object_id: u64,
}

impl ContentRef {
    pub fn forum_post(id: PostId) -> Self {
        Self {
            kind: ContentKind::ForumPost,
            object_id: id.get(),
        }
    }

    pub fn guide(id: GuideId) -> Self {
        Self {
            kind: ContentKind::Guide,
            object_id: id.get(),
        }
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.object_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub target: ContentRef,
    pub author: UserId,
    pub author_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub target: ContentRef,
    pub user: UserId,
    pub created_at: DateTime<Utc>,
}

/// Body of the generic comment endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentDraft {
    pub content_type: String,
    pub object_id: u64,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeToggle {
    pub liked: bool,
    pub likes_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngagementCounts {
    pub comments_count: usize,
    pub likes_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guide_aliases_collapse_to_one_kind() {
        assert_eq!(ContentKind::parse("parent_guide"), Some(ContentKind::Guide));
        assert_eq!(ContentKind::parse("nutrition_guide"), Some(ContentKind::Guide));
        assert_eq!(ContentKind::parse("forum_post"), Some(ContentKind::ForumPost));
        assert_eq!(ContentKind::parse("child"), None);

        let kind: ContentKind = serde_json::from_str("\"nutrition_guide\"").expect("alias parses");
        assert_eq!(kind, ContentKind::Guide);
    }

    #[test]
    fn only_forum_posts_are_likeable() {
        assert!(ContentKind::ForumPost.is_likeable());
        assert!(!ContentKind::Guide.is_likeable());
    }
}
