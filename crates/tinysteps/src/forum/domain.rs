use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{PostId, UserId};
use crate::pagination::PageRequest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForumCategory {
    #[default]
    Advice,
    Feeding,
    Sleep,
    Health,
    Development,
    Care,
}

impl ForumCategory {
    pub const ALL: [ForumCategory; 6] = [
        ForumCategory::Advice,
        ForumCategory::Feeding,
        ForumCategory::Sleep,
        ForumCategory::Health,
        ForumCategory::Development,
        ForumCategory::Care,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ForumCategory::Advice => "Advice",
            ForumCategory::Feeding => "Feeding",
            ForumCategory::Sleep => "Sleep",
            ForumCategory::Health => "Health",
            ForumCategory::Development => "Development",
            ForumCategory::Care => "Baby Care",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: PostId,
    pub title: String,
    pub desc: String,
    pub category: ForumCategory,
    pub author: UserId,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

impl ForumPost {
    /// Case-insensitive match against title and body.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.desc.to_lowercase().contains(needle_lower)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub desc: String,
    #[serde(default)]
    pub category: ForumCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForumPostView {
    #[serde(flatten)]
    pub post: ForumPost,
    pub category_label: &'static str,
    pub comments_count: usize,
    pub likes_count: usize,
}

/// Listing filters; `page`/`per_page` follow [`PageRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<ForumCategory>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub per_page: Option<usize>,
}

impl PostQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }
}
