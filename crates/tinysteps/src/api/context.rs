use std::sync::Arc;

use axum::extract::FromRef;
use chrono::Duration;

use crate::accounts::AccountService;
use crate::children::ChildService;
use crate::contact::ContactService;
use crate::engagement::EngagementService;
use crate::external::{ArticleService, NewsSource, NutritionService, NutritionSource};
use crate::forum::ForumService;
use crate::guides::{GuideService, ModerationService};
use crate::notifications::{MailSettings, Mailer, NotificationService};
use crate::search::SearchService;
use crate::storage::MemoryStore;

/// Outbound seams the services are wired with.
#[derive(Clone)]
pub struct Collaborators {
    pub mailer: Arc<dyn Mailer>,
    pub mail: MailSettings,
    pub session_ttl: Duration,
    pub news: Arc<dyn NewsSource>,
    pub nutrition: Arc<dyn NutritionSource>,
}

/// Router state; handlers pull the one service they need via `FromRef`.
#[derive(Clone)]
pub struct AppContext {
    pub accounts: Arc<AccountService>,
    pub children: Arc<ChildService>,
    pub notifications: Arc<NotificationService>,
    pub engagement: Arc<EngagementService>,
    pub forum: Arc<ForumService>,
    pub guides: Arc<GuideService>,
    pub moderation: Arc<ModerationService>,
    pub contact: Arc<ContactService>,
    pub articles: Arc<ArticleService>,
    pub nutrition: Arc<NutritionService>,
    pub search: Arc<SearchService>,
}

impl AppContext {
    /// Wires every service over one shared store.
    pub fn from_store(store: &MemoryStore, collaborators: Collaborators) -> Self {
        let Collaborators {
            mailer,
            mail,
            session_ttl,
            news,
            nutrition,
        } = collaborators;
        let store = Arc::new(store.clone());

        let accounts = Arc::new(AccountService::new(
            store.clone(),
            store.clone(),
            mailer.clone(),
            mail.clone(),
            session_ttl,
        ));
        let children = Arc::new(ChildService::new(store.clone(), store.clone()));
        let notifications = Arc::new(NotificationService::new(store.clone()));
        let engagement = Arc::new(EngagementService::new(store.clone(), store.clone()));
        let forum = Arc::new(ForumService::new(store.clone(), engagement.clone()));
        let guides = Arc::new(GuideService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            engagement.clone(),
            mailer.clone(),
            mail.clone(),
        ));
        let moderation = Arc::new(ModerationService::new(
            store.clone(),
            store.clone(),
            notifications.clone(),
            mailer.clone(),
            mail.clone(),
        ));
        let contact = Arc::new(ContactService::new(store.clone(), mailer, mail));
        let articles = Arc::new(ArticleService::new(store.clone(), news));
        let nutrition = Arc::new(NutritionService::new(store, nutrition));
        let search = Arc::new(SearchService::new(forum.clone(), guides.clone()));

        Self {
            accounts,
            children,
            notifications,
            engagement,
            forum,
            guides,
            moderation,
            contact,
            articles,
            nutrition,
            search,
        }
    }
}

macro_rules! service_from_context {
    ($($field:ident: $service:ty),+ $(,)?) => {
        $(
            impl FromRef<AppContext> for Arc<$service> {
                fn from_ref(context: &AppContext) -> Self {
                    context.$field.clone()
                }
            }
        )+
    };
}

service_from_context!(
    accounts: AccountService,
    children: ChildService,
    notifications: NotificationService,
    engagement: EngagementService,
    forum: ForumService,
    guides: GuideService,
    moderation: ModerationService,
    contact: ContactService,
    articles: ArticleService,
    nutrition: NutritionService,
    search: SearchService,
);
