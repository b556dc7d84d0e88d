//! Fixtures shared by the unit test modules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt;

use crate::accounts::{Credentials, Registration, User};
use crate::api::{api_router, AppContext, Collaborators};
use crate::external::{NewsItem, NewsSource, NutritionSource, SourceError};
use crate::notifications::{MailSettings, MemoryMailer};
use crate::storage::MemoryStore;

pub(crate) const PASSWORD: &str = "sunny-day-42";

/// News source answering every query with the same items.
#[derive(Default)]
pub(crate) struct StaticNews {
    pub(crate) items: Vec<NewsItem>,
    pub(crate) queries: Mutex<Vec<String>>,
}

#[async_trait]
impl NewsSource for StaticNews {
    async fn search(&self, query: &str) -> Result<Vec<NewsItem>, SourceError> {
        self.queries
            .lock()
            .expect("queries mutex poisoned")
            .push(query.to_string());
        Ok(self.items.clone())
    }
}

/// Nutrition source returning a fixed payload, or a 503 when it has none.
#[derive(Default)]
pub(crate) struct StaticNutrition {
    pub(crate) payload: Option<Value>,
    pub(crate) calls: AtomicUsize,
}

impl StaticNutrition {
    pub(crate) fn returning(payload: Value) -> Self {
        Self {
            payload: Some(payload),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NutritionSource for StaticNutrition {
    async fn nutrition(&self, _ingredient: &str) -> Result<Value, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payload.clone().ok_or(SourceError::Status(503))
    }
}

pub(crate) fn mail_settings() -> MailSettings {
    MailSettings {
        from_address: "no-reply@tinysteps.test".to_string(),
        site_url: "https://tinysteps.test".to_string(),
        admin_emails: vec!["admin@tinysteps.test".to_string()],
    }
}

/// Every service wired over one fresh store, with mail captured in memory.
pub(crate) struct TestApp {
    pub(crate) store: MemoryStore,
    pub(crate) mailer: MemoryMailer,
    pub(crate) context: AppContext,
}

impl TestApp {
    pub(crate) fn new() -> Self {
        Self::with_sources(
            Arc::new(StaticNews::default()),
            Arc::new(StaticNutrition::default()),
        )
    }

    pub(crate) fn with_sources(
        news: Arc<dyn NewsSource>,
        nutrition: Arc<dyn NutritionSource>,
    ) -> Self {
        let store = MemoryStore::new();
        let mailer = MemoryMailer::default();
        let context = AppContext::from_store(
            &store,
            Collaborators {
                mailer: Arc::new(mailer.clone()),
                mail: mail_settings(),
                session_ttl: Duration::hours(24),
                news,
                nutrition,
            },
        );
        Self {
            store,
            mailer,
            context,
        }
    }

    pub(crate) fn router(&self) -> Router {
        api_router(self.context.clone())
    }

    pub(crate) fn user(&self, username: &str) -> User {
        self.context
            .accounts
            .register(Registration {
                username: username.to_string(),
                email: format!("{username}@tinysteps.test"),
                password: PASSWORD.to_string(),
                first_name: None,
                last_name: None,
            })
            .expect("registration succeeds")
    }

    pub(crate) fn staff(&self, username: &str) -> User {
        self.context
            .accounts
            .ensure_staff_account(username, PASSWORD, &format!("{username}@tinysteps.test"))
            .expect("staff account created")
    }

    pub(crate) fn token(&self, user: &User) -> String {
        self.context
            .accounts
            .login(Credentials {
                username: user.username.clone(),
                password: PASSWORD.to_string(),
            })
            .expect("login succeeds")
            .token
    }
}

/// Sends one request through `router` and decodes the JSON body (Null when empty).
pub(crate) async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request builds");

    let response = router.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}
