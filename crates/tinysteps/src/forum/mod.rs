//! Parents forum.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{ForumCategory, ForumPost, ForumPostView, PostDraft, PostQuery};
pub use repository::ForumRepository;
pub use router::forum_router;
pub use service::{ForumService, ForumServiceError};
