//! Generic comments and likes keyed by content type and object id.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    Comment, CommentDraft, ContentKind, ContentRef, EngagementCounts, Like, LikeToggle,
};
pub use repository::{ContentResolver, EngagementRepository};
pub use router::engagement_router;
pub use service::{EngagementError, EngagementService};

#[cfg(test)]
mod tests;
