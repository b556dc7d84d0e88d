use super::category::Category;
use super::domain::{Guide, GuideStatus};
use crate::ids::{CategoryId, GuideId, UserId};
use crate::storage::RepositoryError;

/// Parent and nutrition guides share one table keyed by [`GuideId`].
pub trait GuideRepository: Send + Sync {
    /// Fails with `Conflict` when the slug is taken.
    fn insert_guide(&self, guide: Guide) -> Result<Guide, RepositoryError>;
    fn update_guide(&self, guide: Guide) -> Result<(), RepositoryError>;
    fn fetch_guide(&self, id: GuideId) -> Result<Option<Guide>, RepositoryError>;
    fn fetch_by_slug(&self, slug: &str) -> Result<Option<Guide>, RepositoryError>;
    fn delete_guide(&self, id: GuideId) -> Result<(), RepositoryError>;
    /// Every guide, newest first.
    fn guides(&self) -> Result<Vec<Guide>, RepositoryError>;
    fn guides_by(&self, author: UserId) -> Result<Vec<Guide>, RepositoryError>;
    fn count_with_status(&self, status: GuideStatus) -> Result<usize, RepositoryError>;
}

pub trait CategoryRepository: Send + Sync {
    fn insert_category(&self, category: Category) -> Result<Category, RepositoryError>;
    fn fetch_category(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError>;
    /// Ordered by name.
    fn categories(&self) -> Result<Vec<Category>, RepositoryError>;
}
