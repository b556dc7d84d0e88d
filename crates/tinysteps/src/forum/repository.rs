use super::domain::ForumPost;
use crate::ids::{PostId, UserId};
use crate::storage::RepositoryError;

pub trait ForumRepository: Send + Sync {
    fn insert_post(&self, post: ForumPost) -> Result<ForumPost, RepositoryError>;
    fn update_post(&self, post: ForumPost) -> Result<(), RepositoryError>;
    fn fetch_post(&self, id: PostId) -> Result<Option<ForumPost>, RepositoryError>;
    fn delete_post(&self, id: PostId) -> Result<(), RepositoryError>;
    /// Every post, newest first.
    fn posts(&self) -> Result<Vec<ForumPost>, RepositoryError>;
    fn post_count_by(&self, author: UserId) -> Result<usize, RepositoryError>;
}
