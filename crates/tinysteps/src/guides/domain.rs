use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::external::ArticleCategory;
use crate::ids::{CategoryId, GuideId, UserId};

pub const DEFAULT_GUIDE_IMAGE: &str = "/static/res/img/others/default.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideType {
    Parent,
    Nutrition,
}

impl GuideType {
    pub const fn as_str(self) -> &'static str {
        match self {
            GuideType::Parent => "parent",
            GuideType::Nutrition => "nutrition",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            GuideType::Parent => "Parent Guide",
            GuideType::Nutrition => "Nutrition Guide",
        }
    }

    pub const fn predefined_tags(self) -> &'static [&'static str] {
        match self {
            GuideType::Parent => &["parenting", "childcare", "education"],
            GuideType::Nutrition => &["diet", "health", "recipes"],
        }
    }

    /// External article feed shown next to guides of this type.
    pub const fn article_category(self) -> ArticleCategory {
        match self {
            GuideType::Parent => ArticleCategory::Parenting,
            GuideType::Nutrition => ArticleCategory::Nutrition,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl GuideStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            GuideStatus::Pending => "pending",
            GuideStatus::Approved => "approved",
            GuideStatus::Rejected => "rejected",
        }
    }

    /// Moderation moves; staying in the current state is not a move.
    pub fn can_transition_to(self, next: GuideStatus) -> bool {
        matches!(
            (self, next),
            (GuideStatus::Pending, GuideStatus::Approved)
                | (GuideStatus::Pending, GuideStatus::Rejected)
                | (GuideStatus::Rejected, GuideStatus::Approved)
                | (GuideStatus::Approved, GuideStatus::Rejected)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guide {
    pub id: GuideId,
    pub guide_type: GuideType,
    pub title: String,
    pub desc: String,
    pub slug: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub status: GuideStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub author: UserId,
    pub author_name: String,
    pub category: Option<CategoryId>,
    pub rejection_reason: Option<String>,
    pub moderated_by: Option<UserId>,
    pub moderation_notes: Option<String>,
    pub moderation_date: Option<DateTime<Utc>>,
}

impl Guide {
    pub fn is_approved(&self) -> bool {
        self.status == GuideStatus::Approved
    }

    pub fn image(&self) -> &str {
        self.image_url.as_deref().unwrap_or(DEFAULT_GUIDE_IMAGE)
    }

    /// Case-insensitive match against title and body.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.desc.to_lowercase().contains(needle_lower)
    }
}

/// Author-supplied fields for a new or revised guide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideSubmission {
    pub title: String,
    pub desc: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Comma separated.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideView {
    #[serde(flatten)]
    pub guide: Guide,
    pub image: String,
    pub type_label: &'static str,
    pub comments_count: usize,
}

/// `status` query value for moderation listings; `all` or absent means every status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(GuideStatus),
}

impl StatusFilter {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Some(StatusFilter::All),
            Some("pending") => Some(StatusFilter::Only(GuideStatus::Pending)),
            Some("approved") => Some(StatusFilter::Only(GuideStatus::Approved)),
            Some("rejected") => Some(StatusFilter::Only(GuideStatus::Rejected)),
            Some(_) => None,
        }
    }

    pub fn admits(self, status: GuideStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

/// Splits a comma separated list into trimmed, lower-cased, unique tags.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(|tag| tag.trim().to_lowercase()) {
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// ASCII slug: letters and digits kept, everything else folded into single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }
    slug
}

pub fn guide_slug(title: &str, at: DateTime<Utc>) -> String {
    let base = slugify(title);
    let base = if base.is_empty() { "guide".to_string() } else { base };
    format!("{}-{}", base, at.timestamp())
}
