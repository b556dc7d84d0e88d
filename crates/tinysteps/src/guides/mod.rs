//! Parent and nutrition guides, their categories and the moderation queue.

pub mod category;
pub mod domain;
pub mod moderation;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use category::{Category, CategoryCount, CategoryDraft, CategoryNode};
pub use domain::{
    parse_tags, slugify, Guide, GuideStatus, GuideSubmission, GuideType, GuideView, StatusFilter,
};
pub use moderation::{ModerationError, ModerationService};
pub use repository::{CategoryRepository, GuideRepository};
pub use router::guide_router;
pub use service::{GuideServiceError, GuideService, GuideShelf};
