use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{RepositoryError, SnapshotError};
use crate::accounts::{PasswordResetToken, Session, SessionRepository, User, UserRepository};
use crate::children::{
    CalendarEvent, CalendarRepository, Child, ChildRepository, Milestone, Vaccine, VaccineCard,
};
use crate::contact::{ContactRepository, ContactRequest};
use crate::engagement::{
    Comment, ContentKind, ContentRef, ContentResolver, EngagementRepository, Like,
};
use crate::external::{
    ArticleCategory, ArticleRepository, ExternalArticle, NutritionRecord, NutritionRepository,
};
use crate::forum::{ForumPost, ForumRepository};
use crate::guides::{Category, CategoryRepository, Guide, GuideRepository, GuideStatus};
use crate::ids::{
    ArticleId, CategoryId, ChildId, CommentId, ContactId, EventId, GuideId, MilestoneId,
    NotificationId, PostId, UserId, VaccineCardId, VaccineId,
};
use crate::notifications::{Notification, NotificationRepository};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
struct Sequences {
    user: u64,
    child: u64,
    milestone: u64,
    card: u64,
    vaccine: u64,
    event: u64,
    post: u64,
    comment: u64,
    guide: u64,
    category: u64,
    notification: u64,
    contact: u64,
    article: u64,
}

fn next(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

/// Every table of the application, serialized as one JSON document.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
struct Tables {
    sequences: Sequences,
    users: BTreeMap<u64, User>,
    sessions: BTreeMap<String, Session>,
    reset_tokens: BTreeMap<String, PasswordResetToken>,
    children: BTreeMap<u64, Child>,
    milestones: BTreeMap<u64, Milestone>,
    cards: BTreeMap<u64, VaccineCard>,
    vaccines: BTreeMap<u64, Vaccine>,
    events: BTreeMap<u64, CalendarEvent>,
    posts: BTreeMap<u64, ForumPost>,
    comments: BTreeMap<u64, Comment>,
    likes: Vec<Like>,
    guides: BTreeMap<u64, Guide>,
    categories: BTreeMap<u64, Category>,
    notifications: BTreeMap<u64, Notification>,
    contacts: BTreeMap<u64, ContactRequest>,
    articles: BTreeMap<u64, ExternalArticle>,
    nutrition: BTreeMap<String, NutritionRecord>,
}

/// Mutex-guarded store implementing every repository trait.
///
/// Clones share the same tables. When opened with a path the tables are
/// loaded from that JSON snapshot and [`MemoryStore::persist`] writes them back.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    snapshot: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path` when it exists; a missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SnapshotError> {
        let path = path.into();
        let tables = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| SnapshotError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let tables: Tables =
                serde_json::from_str(&raw).map_err(|source| SnapshotError::Format {
                    path: path.display().to_string(),
                    source,
                })?;
            info!(path = %path.display(), users = tables.users.len(), "snapshot loaded");
            tables
        } else {
            Tables::default()
        };

        Ok(Self {
            tables: Arc::new(Mutex::new(tables)),
            snapshot: Some(path),
        })
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }

    /// Writes the snapshot; a store without a path has nothing to persist.
    pub fn persist(&self) -> Result<(), SnapshotError> {
        let Some(path) = self.snapshot.as_ref() else {
            return Ok(());
        };
        let raw = {
            let tables = self.lock();
            serde_json::to_string_pretty(&*tables).map_err(|source| SnapshotError::Format {
                path: path.display().to_string(),
                source,
            })?
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SnapshotError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        fs::write(path, raw).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "snapshot written");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("store mutex poisoned")
    }
}

fn replace<T>(table: &mut BTreeMap<u64, T>, key: u64, value: T) -> Result<(), RepositoryError> {
    match table.get_mut(&key) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(RepositoryError::NotFound),
    }
}

fn remove<T>(table: &mut BTreeMap<u64, T>, key: u64) -> Result<T, RepositoryError> {
    table.remove(&key).ok_or(RepositoryError::NotFound)
}

impl UserRepository for MemoryStore {
    fn insert(&self, mut user: User) -> Result<User, RepositoryError> {
        let mut tables = self.lock();
        if tables
            .users
            .values()
            .any(|existing| existing.username.eq_ignore_ascii_case(&user.username))
        {
            return Err(RepositoryError::Conflict);
        }
        user.id = UserId(next(&mut tables.sequences.user));
        tables.users.insert(user.id.get(), user.clone());
        Ok(user)
    }

    fn update(&self, user: User) -> Result<(), RepositoryError> {
        replace(&mut self.lock().users, user.id.get(), user)
    }

    fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock().users.get(&id.get()).cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|user| user.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let mut users: Vec<User> = self.lock().users.values().cloned().collect();
        users.sort_by(|a, b| b.date_joined.cmp(&a.date_joined).then(b.id.cmp(&a.id)));
        Ok(users)
    }
}

impl SessionRepository for MemoryStore {
    fn insert_session(&self, session: Session) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        if tables.sessions.contains_key(&session.token) {
            return Err(RepositoryError::Conflict);
        }
        tables.sessions.insert(session.token.clone(), session);
        Ok(())
    }

    fn fetch_session(&self, token: &str) -> Result<Option<Session>, RepositoryError> {
        Ok(self.lock().sessions.get(token).cloned())
    }

    fn delete_session(&self, token: &str) -> Result<(), RepositoryError> {
        self.lock()
            .sessions
            .remove(token)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn insert_reset_token(&self, token: PasswordResetToken) -> Result<(), RepositoryError> {
        self.lock()
            .reset_tokens
            .insert(token.token.to_string(), token);
        Ok(())
    }

    fn fetch_reset_token(&self, token: &Uuid) -> Result<Option<PasswordResetToken>, RepositoryError> {
        Ok(self.lock().reset_tokens.get(&token.to_string()).cloned())
    }

    fn update_reset_token(&self, token: PasswordResetToken) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        match tables.reset_tokens.get_mut(&token.token.to_string()) {
            Some(slot) => {
                *slot = token;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

impl NotificationRepository for MemoryStore {
    fn insert(&self, mut notification: Notification) -> Result<Notification, RepositoryError> {
        let mut tables = self.lock();
        notification.id = NotificationId(next(&mut tables.sequences.notification));
        tables
            .notifications
            .insert(notification.id.get(), notification.clone());
        Ok(notification)
    }

    fn update(&self, notification: Notification) -> Result<(), RepositoryError> {
        replace(
            &mut self.lock().notifications,
            notification.id.get(),
            notification,
        )
    }

    fn fetch(&self, id: NotificationId) -> Result<Option<Notification>, RepositoryError> {
        Ok(self.lock().notifications.get(&id.get()).cloned())
    }

    fn for_user(&self, user: UserId) -> Result<Vec<Notification>, RepositoryError> {
        let mut found: Vec<Notification> = self
            .lock()
            .notifications
            .values()
            .filter(|notification| notification.user_id == user)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(found)
    }

    fn exists_on(
        &self,
        user: UserId,
        fragment: &str,
        day: NaiveDate,
    ) -> Result<bool, RepositoryError> {
        Ok(self.lock().notifications.values().any(|notification| {
            notification.user_id == user
                && notification.created_at.date_naive() == day
                && notification.title.contains(fragment)
        }))
    }
}

impl ChildRepository for MemoryStore {
    fn insert_child(&self, mut child: Child) -> Result<Child, RepositoryError> {
        let mut tables = self.lock();
        child.id = ChildId(next(&mut tables.sequences.child));
        tables.children.insert(child.id.get(), child.clone());
        Ok(child)
    }

    fn update_child(&self, child: Child) -> Result<(), RepositoryError> {
        replace(&mut self.lock().children, child.id.get(), child)
    }

    fn fetch_child(&self, id: ChildId) -> Result<Option<Child>, RepositoryError> {
        Ok(self.lock().children.get(&id.get()).cloned())
    }

    fn children_of(&self, owner: UserId) -> Result<Vec<Child>, RepositoryError> {
        let mut found: Vec<Child> = self
            .lock()
            .children
            .values()
            .filter(|child| child.owner == owner)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    fn delete_child(&self, id: ChildId) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        remove(&mut tables.children, id.get())?;
        tables.milestones.retain(|_, milestone| milestone.child_id != id);
        tables.events.retain(|_, event| event.child_id != id);
        let cards: Vec<VaccineCardId> = tables
            .cards
            .values()
            .filter(|card| card.child_id == id)
            .map(|card| card.id)
            .collect();
        tables.cards.retain(|_, card| card.child_id != id);
        tables
            .vaccines
            .retain(|_, vaccine| !cards.contains(&vaccine.card_id));
        Ok(())
    }

    fn insert_milestone(&self, mut milestone: Milestone) -> Result<Milestone, RepositoryError> {
        let mut tables = self.lock();
        milestone.id = MilestoneId(next(&mut tables.sequences.milestone));
        tables.milestones.insert(milestone.id.get(), milestone.clone());
        Ok(milestone)
    }

    fn fetch_milestone(&self, id: MilestoneId) -> Result<Option<Milestone>, RepositoryError> {
        Ok(self.lock().milestones.get(&id.get()).cloned())
    }

    fn milestones_of(&self, child: ChildId) -> Result<Vec<Milestone>, RepositoryError> {
        let mut found: Vec<Milestone> = self
            .lock()
            .milestones
            .values()
            .filter(|milestone| milestone.child_id == child)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.achieved_date
                .cmp(&a.achieved_date)
                .then(b.id.cmp(&a.id))
        });
        Ok(found)
    }

    fn delete_milestone(&self, id: MilestoneId) -> Result<(), RepositoryError> {
        remove(&mut self.lock().milestones, id.get()).map(|_| ())
    }

    fn card_of(&self, child: ChildId) -> Result<Option<VaccineCard>, RepositoryError> {
        Ok(self
            .lock()
            .cards
            .values()
            .find(|card| card.child_id == child)
            .cloned())
    }

    fn insert_card(&self, mut card: VaccineCard) -> Result<VaccineCard, RepositoryError> {
        let mut tables = self.lock();
        if tables.cards.values().any(|existing| existing.child_id == card.child_id) {
            return Err(RepositoryError::Conflict);
        }
        card.id = VaccineCardId(next(&mut tables.sequences.card));
        tables.cards.insert(card.id.get(), card.clone());
        Ok(card)
    }

    fn fetch_card(&self, id: VaccineCardId) -> Result<Option<VaccineCard>, RepositoryError> {
        Ok(self.lock().cards.get(&id.get()).cloned())
    }

    fn insert_vaccine(&self, mut vaccine: Vaccine) -> Result<Vaccine, RepositoryError> {
        let mut tables = self.lock();
        if !tables.cards.contains_key(&vaccine.card_id.get()) {
            return Err(RepositoryError::NotFound);
        }
        vaccine.id = VaccineId(next(&mut tables.sequences.vaccine));
        tables.vaccines.insert(vaccine.id.get(), vaccine.clone());
        Ok(vaccine)
    }

    fn update_vaccine(&self, vaccine: Vaccine) -> Result<(), RepositoryError> {
        replace(&mut self.lock().vaccines, vaccine.id.get(), vaccine)
    }

    fn fetch_vaccine(&self, id: VaccineId) -> Result<Option<Vaccine>, RepositoryError> {
        Ok(self.lock().vaccines.get(&id.get()).cloned())
    }

    fn vaccines_on(&self, card: VaccineCardId) -> Result<Vec<Vaccine>, RepositoryError> {
        let mut found: Vec<Vaccine> = self
            .lock()
            .vaccines
            .values()
            .filter(|vaccine| vaccine.card_id == card)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            let next_dose = match (a.next_dose_date, b.next_dose_date) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            };
            next_dose.then(a.date.cmp(&b.date)).then(a.id.cmp(&b.id))
        });
        Ok(found)
    }

    fn delete_vaccine(&self, id: VaccineId) -> Result<(), RepositoryError> {
        remove(&mut self.lock().vaccines, id.get()).map(|_| ())
    }
}

impl CalendarRepository for MemoryStore {
    fn insert_event(&self, mut event: CalendarEvent) -> Result<CalendarEvent, RepositoryError> {
        let mut tables = self.lock();
        event.id = EventId(next(&mut tables.sequences.event));
        tables.events.insert(event.id.get(), event.clone());
        Ok(event)
    }

    fn update_event(&self, event: CalendarEvent) -> Result<(), RepositoryError> {
        replace(&mut self.lock().events, event.id.get(), event)
    }

    fn fetch_event(&self, id: EventId) -> Result<Option<CalendarEvent>, RepositoryError> {
        Ok(self.lock().events.get(&id.get()).cloned())
    }

    fn delete_event(&self, id: EventId) -> Result<(), RepositoryError> {
        remove(&mut self.lock().events, id.get()).map(|_| ())
    }

    fn events_of(&self, child: ChildId) -> Result<Vec<CalendarEvent>, RepositoryError> {
        let mut found: Vec<CalendarEvent> = self
            .lock()
            .events
            .values()
            .filter(|event| event.child_id == child)
            .cloned()
            .collect();
        found.sort_by_key(CalendarEvent::sort_key);
        Ok(found)
    }

    fn reminders_on(&self, date: NaiveDate) -> Result<Vec<CalendarEvent>, RepositoryError> {
        let mut found: Vec<CalendarEvent> = self
            .lock()
            .events
            .values()
            .filter(|event| event.date == date && event.has_reminder)
            .cloned()
            .collect();
        found.sort_by_key(CalendarEvent::sort_key);
        Ok(found)
    }
}

impl EngagementRepository for MemoryStore {
    fn insert_comment(&self, mut comment: Comment) -> Result<Comment, RepositoryError> {
        let mut tables = self.lock();
        comment.id = CommentId(next(&mut tables.sequences.comment));
        tables.comments.insert(comment.id.get(), comment.clone());
        Ok(comment)
    }

    fn fetch_comment(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError> {
        Ok(self.lock().comments.get(&id.get()).cloned())
    }

    fn delete_comment(&self, id: CommentId) -> Result<(), RepositoryError> {
        remove(&mut self.lock().comments, id.get()).map(|_| ())
    }

    fn comments_on(&self, target: ContentRef) -> Result<Vec<Comment>, RepositoryError> {
        let mut found: Vec<Comment> = self
            .lock()
            .comments
            .values()
            .filter(|comment| comment.target == target)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    fn comment_count(&self, target: ContentRef) -> Result<usize, RepositoryError> {
        Ok(self
            .lock()
            .comments
            .values()
            .filter(|comment| comment.target == target)
            .count())
    }

    fn toggle_like(
        &self,
        target: ContentRef,
        user: UserId,
        at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.lock();
        let before = tables.likes.len();
        tables
            .likes
            .retain(|like| !(like.target == target && like.user == user));
        if tables.likes.len() < before {
            return Ok(false);
        }
        tables.likes.push(Like {
            target,
            user,
            created_at: at,
        });
        Ok(true)
    }

    fn like_count(&self, target: ContentRef) -> Result<usize, RepositoryError> {
        Ok(self
            .lock()
            .likes
            .iter()
            .filter(|like| like.target == target)
            .count())
    }

    fn has_liked(&self, target: ContentRef, user: UserId) -> Result<bool, RepositoryError> {
        Ok(self
            .lock()
            .likes
            .iter()
            .any(|like| like.target == target && like.user == user))
    }

    fn purge(&self, target: ContentRef) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        tables.comments.retain(|_, comment| comment.target != target);
        tables.likes.retain(|like| like.target != target);
        Ok(())
    }
}

impl ContentResolver for MemoryStore {
    fn content_exists(&self, target: ContentRef) -> Result<bool, RepositoryError> {
        let tables = self.lock();
        Ok(match target.kind {
            ContentKind::ForumPost => tables.posts.contains_key(&target.object_id),
            ContentKind::Guide => tables.guides.contains_key(&target.object_id),
        })
    }
}

impl ForumRepository for MemoryStore {
    fn insert_post(&self, mut post: ForumPost) -> Result<ForumPost, RepositoryError> {
        let mut tables = self.lock();
        post.id = PostId(next(&mut tables.sequences.post));
        tables.posts.insert(post.id.get(), post.clone());
        Ok(post)
    }

    fn update_post(&self, post: ForumPost) -> Result<(), RepositoryError> {
        replace(&mut self.lock().posts, post.id.get(), post)
    }

    fn fetch_post(&self, id: PostId) -> Result<Option<ForumPost>, RepositoryError> {
        Ok(self.lock().posts.get(&id.get()).cloned())
    }

    fn delete_post(&self, id: PostId) -> Result<(), RepositoryError> {
        remove(&mut self.lock().posts, id.get()).map(|_| ())
    }

    fn posts(&self) -> Result<Vec<ForumPost>, RepositoryError> {
        let mut posts: Vec<ForumPost> = self.lock().posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    fn post_count_by(&self, author: UserId) -> Result<usize, RepositoryError> {
        Ok(self
            .lock()
            .posts
            .values()
            .filter(|post| post.author == author)
            .count())
    }
}

impl GuideRepository for MemoryStore {
    fn insert_guide(&self, mut guide: Guide) -> Result<Guide, RepositoryError> {
        let mut tables = self.lock();
        if tables.guides.values().any(|existing| existing.slug == guide.slug) {
            return Err(RepositoryError::Conflict);
        }
        guide.id = GuideId(next(&mut tables.sequences.guide));
        tables.guides.insert(guide.id.get(), guide.clone());
        Ok(guide)
    }

    fn update_guide(&self, guide: Guide) -> Result<(), RepositoryError> {
        replace(&mut self.lock().guides, guide.id.get(), guide)
    }

    fn fetch_guide(&self, id: GuideId) -> Result<Option<Guide>, RepositoryError> {
        Ok(self.lock().guides.get(&id.get()).cloned())
    }

    fn fetch_by_slug(&self, slug: &str) -> Result<Option<Guide>, RepositoryError> {
        Ok(self
            .lock()
            .guides
            .values()
            .find(|guide| guide.slug == slug)
            .cloned())
    }

    fn delete_guide(&self, id: GuideId) -> Result<(), RepositoryError> {
        remove(&mut self.lock().guides, id.get()).map(|_| ())
    }

    fn guides(&self) -> Result<Vec<Guide>, RepositoryError> {
        let mut guides: Vec<Guide> = self.lock().guides.values().cloned().collect();
        guides.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(guides)
    }

    fn guides_by(&self, author: UserId) -> Result<Vec<Guide>, RepositoryError> {
        Ok(self
            .guides()?
            .into_iter()
            .filter(|guide| guide.author == author)
            .collect())
    }

    fn count_with_status(&self, status: GuideStatus) -> Result<usize, RepositoryError> {
        Ok(self
            .lock()
            .guides
            .values()
            .filter(|guide| guide.status == status)
            .count())
    }
}

impl CategoryRepository for MemoryStore {
    fn insert_category(&self, mut category: Category) -> Result<Category, RepositoryError> {
        let mut tables = self.lock();
        category.id = CategoryId(next(&mut tables.sequences.category));
        tables.categories.insert(category.id.get(), category.clone());
        Ok(category)
    }

    fn fetch_category(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        Ok(self.lock().categories.get(&id.get()).cloned())
    }

    fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let mut categories: Vec<Category> = self.lock().categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

impl ContactRepository for MemoryStore {
    fn insert_request(&self, mut request: ContactRequest) -> Result<ContactRequest, RepositoryError> {
        let mut tables = self.lock();
        request.id = ContactId(next(&mut tables.sequences.contact));
        tables.contacts.insert(request.id.get(), request.clone());
        Ok(request)
    }

    fn fetch_request(&self, id: ContactId) -> Result<Option<ContactRequest>, RepositoryError> {
        Ok(self.lock().contacts.get(&id.get()).cloned())
    }

    fn requests(&self) -> Result<Vec<ContactRequest>, RepositoryError> {
        let mut requests: Vec<ContactRequest> = self.lock().contacts.values().cloned().collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(requests)
    }
}

impl ArticleRepository for MemoryStore {
    fn upsert_article(
        &self,
        mut article: ExternalArticle,
    ) -> Result<(ExternalArticle, bool), RepositoryError> {
        let mut tables = self.lock();
        let existing = tables
            .articles
            .values()
            .find(|stored| stored.url == article.url)
            .map(|stored| (stored.id, stored.created_at));
        let created = match existing {
            Some((id, created_at)) => {
                article.id = id;
                article.created_at = created_at;
                false
            }
            None => {
                article.id = ArticleId(next(&mut tables.sequences.article));
                true
            }
        };
        tables.articles.insert(article.id.get(), article.clone());
        Ok((article, created))
    }

    fn fetch_article(&self, id: ArticleId) -> Result<Option<ExternalArticle>, RepositoryError> {
        Ok(self.lock().articles.get(&id.get()).cloned())
    }

    fn articles(
        &self,
        category: Option<ArticleCategory>,
    ) -> Result<Vec<ExternalArticle>, RepositoryError> {
        let mut articles: Vec<ExternalArticle> = self
            .lock()
            .articles
            .values()
            .filter(|article| category.map_or(true, |wanted| article.category == wanted))
            .cloned()
            .collect();
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at).then(b.id.cmp(&a.id)));
        Ok(articles)
    }
}

impl NutritionRepository for MemoryStore {
    fn fetch_record(&self, ingredient: &str) -> Result<Option<NutritionRecord>, RepositoryError> {
        Ok(self
            .lock()
            .nutrition
            .get(&ingredient.trim().to_lowercase())
            .cloned())
    }

    fn upsert_record(&self, record: NutritionRecord) -> Result<NutritionRecord, RepositoryError> {
        self.lock()
            .nutrition
            .insert(record.ingredient.trim().to_lowercase(), record.clone());
        Ok(record)
    }

    fn ingredients(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .lock()
            .nutrition
            .values()
            .map(|record| record.ingredient.clone())
            .collect())
    }
}
