use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{ForumPost, ForumPostView, PostDraft, PostQuery};
use super::repository::ForumRepository;
use crate::accounts::User;
use crate::engagement::{Comment, ContentRef, EngagementError, EngagementService, LikeToggle};
use crate::ids::{PostId, UserId};
use crate::pagination::Page;
use crate::storage::RepositoryError;
use crate::validation::{self, FieldError};

/// Parents forum: posts plus their comments and likes.
pub struct ForumService {
    posts: Arc<dyn ForumRepository>,
    engagement: Arc<EngagementService>,
}

impl ForumService {
    pub fn new(posts: Arc<dyn ForumRepository>, engagement: Arc<EngagementService>) -> Self {
        Self { posts, engagement }
    }

    pub fn list(&self, query: &PostQuery) -> Result<Page<ForumPostView>, ForumServiceError> {
        let term = query.search_term();
        let matching: Vec<ForumPost> = self
            .posts
            .posts()?
            .into_iter()
            .filter(|post| query.category.map_or(true, |category| post.category == category))
            .filter(|post| term.as_deref().map_or(true, |term| post.matches(term)))
            .collect();

        let page = Page::paginate(matching, query.page_request());
        let items = page
            .items
            .iter()
            .map(|post| self.view(post.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            total_pages: page.total_pages,
        })
    }

    /// Case-insensitive search over title and body, newest first.
    pub fn search(&self, term: &str, limit: Option<usize>) -> Result<Vec<ForumPost>, ForumServiceError> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let found = self
            .posts
            .posts()?
            .into_iter()
            .filter(|post| post.matches(&needle));
        Ok(match limit {
            Some(limit) => found.take(limit).collect(),
            None => found.collect(),
        })
    }

    pub fn get(&self, id: PostId) -> Result<ForumPost, ForumServiceError> {
        self.posts.fetch_post(id)?.ok_or(ForumServiceError::NotFound)
    }

    pub fn detail(&self, id: PostId) -> Result<ForumPostView, ForumServiceError> {
        let post = self.get(id)?;
        self.view(post)
    }

    fn view(&self, post: ForumPost) -> Result<ForumPostView, ForumServiceError> {
        let counts = self.engagement.counts(ContentRef::forum_post(post.id))?;
        Ok(ForumPostView {
            category_label: post.category.label(),
            comments_count: counts.comments_count,
            likes_count: counts.likes_count,
            post,
        })
    }

    pub fn create(&self, author: &User, draft: PostDraft) -> Result<ForumPost, ForumServiceError> {
        let (title, desc) = validate(&draft)?;
        let post = self.posts.insert_post(ForumPost {
            id: PostId::UNASSIGNED,
            title,
            desc,
            category: draft.category,
            author: author.id,
            author_name: author.username.clone(),
            created_at: Utc::now(),
        })?;
        info!(post_id = %post.id, author = %author.id, "forum post created");
        Ok(post)
    }

    pub fn update(
        &self,
        requester: &User,
        id: PostId,
        draft: PostDraft,
    ) -> Result<ForumPost, ForumServiceError> {
        let mut post = self.owned(requester, id)?;
        let (title, desc) = validate(&draft)?;
        post.title = title;
        post.desc = desc;
        post.category = draft.category;
        self.posts.update_post(post.clone())?;
        Ok(post)
    }

    /// Removes the post along with its comments and likes.
    pub fn delete(&self, requester: &User, id: PostId) -> Result<(), ForumServiceError> {
        self.owned(requester, id)?;
        self.posts.delete_post(id)?;
        self.engagement.purge(ContentRef::forum_post(id))?;
        info!(post_id = %id, deleted_by = %requester.id, "forum post deleted");
        Ok(())
    }

    fn owned(&self, requester: &User, id: PostId) -> Result<ForumPost, ForumServiceError> {
        let post = self.get(id)?;
        if post.author != requester.id && !requester.is_staff {
            return Err(ForumServiceError::Forbidden);
        }
        Ok(post)
    }

    pub fn comments(&self, id: PostId) -> Result<Vec<Comment>, ForumServiceError> {
        self.get(id)?;
        Ok(self.engagement.comments(ContentRef::forum_post(id))?)
    }

    pub fn add_comment(
        &self,
        author: &User,
        id: PostId,
        text: &str,
    ) -> Result<Comment, ForumServiceError> {
        self.get(id)?;
        Ok(self
            .engagement
            .add_comment(author, ContentRef::forum_post(id), text)?)
    }

    pub fn toggle_like(&self, user: &User, id: PostId) -> Result<LikeToggle, ForumServiceError> {
        self.get(id)?;
        Ok(self.engagement.toggle_like(user, ContentRef::forum_post(id))?)
    }

    /// Posts created in the last `days` days, most liked first.
    pub fn popular(
        &self,
        now: DateTime<Utc>,
        days: i64,
        limit: usize,
    ) -> Result<Vec<ForumPostView>, ForumServiceError> {
        let since = now - validation::window_days(days);
        let mut recent = self
            .posts
            .posts()?
            .into_iter()
            .filter(|post| post.created_at >= since)
            .map(|post| self.view(post))
            .collect::<Result<Vec<_>, _>>()?;
        recent.sort_by(|a, b| {
            b.likes_count
                .cmp(&a.likes_count)
                .then_with(|| b.post.created_at.cmp(&a.post.created_at))
        });
        recent.truncate(limit);
        Ok(recent)
    }

    pub fn user_post_count(&self, user: UserId) -> Result<usize, ForumServiceError> {
        Ok(self.posts.post_count_by(user)?)
    }
}

fn validate(draft: &PostDraft) -> Result<(String, String), FieldError> {
    Ok((
        validation::bounded_text("title", &draft.title, 1, 100)?,
        validation::bounded_text("desc", &draft.desc, 1, 2000)?,
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum ForumServiceError {
    #[error(transparent)]
    Invalid(#[from] FieldError),
    #[error("forum post not found")]
    NotFound,
    #[error("only the author or staff can change this post")]
    Forbidden,
    #[error(transparent)]
    Engagement(#[from] EngagementError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
