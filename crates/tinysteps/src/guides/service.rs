use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use super::category::{category_tree, full_name, Category, CategoryCount, CategoryDraft, CategoryNode};
use super::domain::{
    guide_slug, parse_tags, Guide, GuideStatus, GuideSubmission, GuideType, GuideView,
};
use super::repository::{CategoryRepository, GuideRepository};
use crate::accounts::User;
use crate::engagement::{Comment, ContentRef, EngagementError, EngagementService};
use crate::external::{ArticleRepository, ExternalArticle};
use crate::ids::{CategoryId, GuideId, UserId};
use crate::notifications::{MailSettings, Mailer};
use crate::storage::RepositoryError;
use crate::validation::{self, FieldError};

pub const DEFAULT_LATEST: usize = 5;
pub const RELATED_GUIDES: usize = 3;
const SLUG_ATTEMPTS: u32 = 50;

/// Guide authoring, visibility and the per-type shelves.
pub struct GuideService {
    guides: Arc<dyn GuideRepository>,
    categories: Arc<dyn CategoryRepository>,
    articles: Arc<dyn ArticleRepository>,
    engagement: Arc<EngagementService>,
    mailer: Arc<dyn Mailer>,
    mail: MailSettings,
}

impl GuideService {
    pub fn new(
        guides: Arc<dyn GuideRepository>,
        categories: Arc<dyn CategoryRepository>,
        articles: Arc<dyn ArticleRepository>,
        engagement: Arc<EngagementService>,
        mailer: Arc<dyn Mailer>,
        mail: MailSettings,
    ) -> Self {
        Self {
            guides,
            categories,
            articles,
            engagement,
            mailer,
            mail,
        }
    }

    /// Read-side operations restricted to one guide type.
    pub fn shelf(&self, guide_type: GuideType) -> GuideShelf<'_> {
        GuideShelf {
            service: self,
            guide_type,
        }
    }

    /// New guides always wait for moderation; administrators are e-mailed.
    pub fn submit(
        &self,
        author: &User,
        guide_type: GuideType,
        submission: GuideSubmission,
    ) -> Result<Guide, GuideServiceError> {
        let fields = self.validated(&submission)?;
        let now = Utc::now();
        let mut guide = Guide {
            id: GuideId::UNASSIGNED,
            guide_type,
            title: fields.title,
            desc: fields.desc,
            slug: guide_slug(&submission.title, now),
            summary: fields.summary,
            image_url: fields.image_url,
            tags: fields.tags,
            status: GuideStatus::Pending,
            created_at: now,
            updated_at: now,
            published_at: None,
            approved_at: None,
            author: author.id,
            author_name: author.username.clone(),
            category: submission.category,
            rejection_reason: None,
            moderated_by: None,
            moderation_notes: None,
            moderation_date: None,
        };

        let base_slug = guide.slug.clone();
        let mut attempt = 1;
        let guide = loop {
            match self.guides.insert_guide(guide.clone()) {
                Ok(stored) => break stored,
                Err(RepositoryError::Conflict) if attempt < SLUG_ATTEMPTS => {
                    attempt += 1;
                    guide.slug = format!("{base_slug}-{attempt}");
                }
                Err(other) => return Err(other.into()),
            }
        };

        info!(guide_id = %guide.id, guide_type = guide_type.as_str(), author = %author.id, "guide submitted");
        self.notify_admins(&guide, author);
        Ok(guide)
    }

    fn notify_admins(&self, guide: &Guide, author: &User) {
        if self.mail.admin_emails.is_empty() {
            return;
        }
        let body = format!(
            "A new {} was submitted for review.\n\nTitle: {}\nAuthor: {}\n\nReview pending guides at {}",
            guide.guide_type.label().to_lowercase(),
            guide.title,
            author.display_name(),
            self.mail.link("/api/v1/moderation/pending"),
        );
        let email = self.mail.email(
            self.mail.admin_emails.clone(),
            format!("New guide pending review: {}", guide.title),
            body,
        );
        if let Err(err) = self.mailer.send(email) {
            error!(guide_id = %guide.id, error = %err, "failed to notify administrators");
        }
    }

    /// Author-only edit; the guide returns to `pending` and loses rejection data.
    pub fn revise(
        &self,
        author: &User,
        id: GuideId,
        submission: GuideSubmission,
    ) -> Result<Guide, GuideServiceError> {
        let mut guide = self.fetch(id)?;
        if guide.author != author.id {
            return Err(GuideServiceError::Forbidden);
        }

        let fields = self.validated(&submission)?;
        guide.title = fields.title;
        guide.desc = fields.desc;
        guide.summary = fields.summary;
        guide.image_url = fields.image_url;
        guide.tags = fields.tags;
        guide.category = submission.category;
        guide.status = GuideStatus::Pending;
        guide.rejection_reason = None;
        guide.updated_at = Utc::now();
        self.guides.update_guide(guide.clone())?;
        info!(guide_id = %id, "guide revised and resubmitted");
        Ok(guide)
    }

    pub fn set_tags(&self, requester: &User, id: GuideId, raw: &str) -> Result<Guide, GuideServiceError> {
        let mut guide = self.fetch(id)?;
        if guide.author != requester.id && !requester.is_staff {
            return Err(GuideServiceError::Forbidden);
        }
        guide.tags = parse_tags(raw);
        guide.updated_at = Utc::now();
        self.guides.update_guide(guide.clone())?;
        Ok(guide)
    }

    pub fn delete(&self, requester: &User, id: GuideId) -> Result<(), GuideServiceError> {
        let guide = self.fetch(id)?;
        if guide.author != requester.id && !requester.is_staff {
            return Err(GuideServiceError::Forbidden);
        }
        self.guides.delete_guide(id)?;
        self.engagement.purge(ContentRef::guide(id))?;
        info!(guide_id = %id, deleted_by = %requester.id, "guide deleted");
        Ok(())
    }

    /// Approved guides are public; others only reach their author and staff.
    pub fn visible(&self, viewer: Option<&User>, id: GuideId) -> Result<Guide, GuideServiceError> {
        let guide = self.fetch(id)?;
        if is_visible_to(&guide, viewer) {
            Ok(guide)
        } else {
            Err(GuideServiceError::NotFound)
        }
    }

    pub fn by_author(&self, author: UserId) -> Result<Vec<Guide>, GuideServiceError> {
        Ok(self.guides.guides_by(author)?)
    }

    pub fn view(&self, guide: Guide) -> Result<GuideView, GuideServiceError> {
        let counts = self.engagement.counts(ContentRef::guide(guide.id))?;
        Ok(GuideView {
            image: guide.image().to_string(),
            type_label: guide.guide_type.label(),
            comments_count: counts.comments_count,
            guide,
        })
    }

    pub fn comments(&self, viewer: Option<&User>, id: GuideId) -> Result<Vec<Comment>, GuideServiceError> {
        self.visible(viewer, id)?;
        Ok(self.engagement.comments(ContentRef::guide(id))?)
    }

    pub fn add_comment(&self, author: &User, id: GuideId, text: &str) -> Result<Comment, GuideServiceError> {
        self.visible(Some(author), id)?;
        Ok(self.engagement.add_comment(author, ContentRef::guide(id), text)?)
    }

    pub fn categories(&self) -> Result<Vec<Category>, GuideServiceError> {
        Ok(self.categories.categories()?)
    }

    pub fn category_tree(&self) -> Result<Vec<CategoryNode>, GuideServiceError> {
        Ok(category_tree(&self.categories.categories()?))
    }

    pub fn category_full_name(&self, id: CategoryId) -> Result<String, GuideServiceError> {
        let all = self.categories.categories()?;
        let category = all
            .iter()
            .find(|category| category.id == id)
            .ok_or(GuideServiceError::CategoryNotFound)?;
        Ok(full_name(category, &all))
    }

    pub fn create_category(
        &self,
        requester: &User,
        draft: CategoryDraft,
    ) -> Result<Category, GuideServiceError> {
        if !requester.is_staff {
            return Err(GuideServiceError::Forbidden);
        }
        if let Some(parent) = draft.parent {
            self.categories
                .fetch_category(parent)?
                .ok_or(GuideServiceError::CategoryNotFound)?;
        }
        let category = Category {
            id: CategoryId::UNASSIGNED,
            name: validation::bounded_text("name", &draft.name, 1, 100)?,
            description: validation::optional_text("description", draft.description.as_deref(), 2000)?,
            parent: draft.parent,
        };
        Ok(self.categories.insert_category(category)?)
    }

    fn fetch(&self, id: GuideId) -> Result<Guide, GuideServiceError> {
        self.guides.fetch_guide(id)?.ok_or(GuideServiceError::NotFound)
    }

    fn validated(&self, submission: &GuideSubmission) -> Result<ValidatedGuide, GuideServiceError> {
        if let Some(category) = submission.category {
            self.categories
                .fetch_category(category)?
                .ok_or(GuideServiceError::CategoryNotFound)?;
        }
        Ok(ValidatedGuide {
            title: validation::bounded_text("title", &submission.title, 5, 100)?,
            desc: validation::bounded_text("desc", &submission.desc, 300, 2000)?,
            summary: validation::optional_text("summary", submission.summary.as_deref(), 200)?,
            image_url: validation::optional_url("image_url", submission.image_url.as_deref())?,
            tags: submission.tags.as_deref().map(parse_tags).unwrap_or_default(),
        })
    }

    fn approved_of(&self, guide_type: GuideType) -> Result<Vec<Guide>, GuideServiceError> {
        Ok(self
            .guides
            .guides()?
            .into_iter()
            .filter(|guide| guide.guide_type == guide_type && guide.is_approved())
            .collect())
    }
}

struct ValidatedGuide {
    title: String,
    desc: String,
    summary: Option<String>,
    image_url: Option<String>,
    tags: Vec<String>,
}

pub fn is_visible_to(guide: &Guide, viewer: Option<&User>) -> bool {
    guide.is_approved()
        || viewer.is_some_and(|viewer| viewer.is_staff || viewer.id == guide.author)
}

/// One guide type's public face: approved listings, detail pages and the
/// article feed that goes with them.
pub struct GuideShelf<'a> {
    service: &'a GuideService,
    guide_type: GuideType,
}

impl GuideShelf<'_> {
    pub fn guide_type(&self) -> GuideType {
        self.guide_type
    }

    /// Approved guides, newest first.
    pub fn approved(
        &self,
        limit: Option<usize>,
        exclude: Option<GuideId>,
    ) -> Result<Vec<Guide>, GuideServiceError> {
        let guides = self
            .service
            .approved_of(self.guide_type)?
            .into_iter()
            .filter(|guide| Some(guide.id) != exclude);
        Ok(match limit {
            Some(limit) => guides.take(limit).collect(),
            None => guides.collect(),
        })
    }

    pub fn latest(&self, count: usize) -> Result<Vec<Guide>, GuideServiceError> {
        self.approved(Some(count), None)
    }

    /// A guide of another type is reported as missing.
    pub fn detail(&self, viewer: Option<&User>, id: GuideId) -> Result<Guide, GuideServiceError> {
        let guide = self.service.visible(viewer, id)?;
        if guide.guide_type != self.guide_type {
            return Err(GuideServiceError::NotFound);
        }
        Ok(guide)
    }

    pub fn related(&self, id: GuideId) -> Result<Vec<Guide>, GuideServiceError> {
        self.approved(Some(RELATED_GUIDES), Some(id))
    }

    pub fn search(&self, term: &str, limit: Option<usize>) -> Result<Vec<Guide>, GuideServiceError> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let found = self
            .service
            .approved_of(self.guide_type)?
            .into_iter()
            .filter(|guide| guide.matches(&needle));
        Ok(match limit {
            Some(limit) => found.take(limit).collect(),
            None => found.collect(),
        })
    }

    /// Categories holding at least one approved guide of this type.
    pub fn categories(&self) -> Result<Vec<CategoryCount>, GuideServiceError> {
        let mut counts: HashMap<CategoryId, usize> = HashMap::new();
        for guide in self.service.approved_of(self.guide_type)? {
            if let Some(category) = guide.category {
                *counts.entry(category).or_default() += 1;
            }
        }
        Ok(self
            .service
            .categories
            .categories()?
            .into_iter()
            .filter_map(|category| {
                counts.get(&category.id).map(|count| CategoryCount {
                    guide_count: *count,
                    category,
                })
            })
            .collect())
    }

    pub fn articles(&self, limit: Option<usize>) -> Result<Vec<ExternalArticle>, GuideServiceError> {
        let mut articles = self
            .service
            .articles
            .articles(Some(self.guide_type.article_category()))?;
        if let Some(limit) = limit {
            articles.truncate(limit);
        }
        Ok(articles)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GuideServiceError {
    #[error(transparent)]
    Invalid(#[from] FieldError),
    #[error("guide not found")]
    NotFound,
    #[error("category not found")]
    CategoryNotFound,
    #[error("you do not have permission to perform this action")]
    Forbidden,
    #[error(transparent)]
    Engagement(#[from] EngagementError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
