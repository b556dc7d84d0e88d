use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tinysteps::api::{AppContext, Collaborators};
use tinysteps::config::AppConfig;
use tinysteps::error::AppError;
use tinysteps::external::{EdamamClient, NewsApiClient};
use tinysteps::notifications::{LogMailer, ReminderJob};
use tinysteps::storage::MemoryStore;
use tracing::info;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store plus the services wired over it.
pub(crate) struct Runtime {
    pub(crate) store: MemoryStore,
    pub(crate) context: AppContext,
}

impl Runtime {
    /// Opens the configured snapshot (or an empty store) and wires every service.
    pub(crate) fn build(config: &AppConfig) -> Result<Self, AppError> {
        let store = match &config.storage.data_file {
            Some(path) => MemoryStore::open(path)?,
            None => MemoryStore::new(),
        };
        let context = AppContext::from_store(&store, collaborators(config)?);
        Ok(Self { store, context })
    }

    pub(crate) fn reminder_job(&self) -> ReminderJob {
        let store = Arc::new(self.store.clone());
        ReminderJob::new(store.clone(), store.clone(), store)
    }

    /// Creates or promotes the configured staff account, if any.
    pub(crate) fn bootstrap_admin(&self, config: &AppConfig) -> Result<(), AppError> {
        let Some(admin) = &config.auth.admin else {
            return Ok(());
        };
        let user = self
            .context
            .accounts
            .ensure_staff_account(&admin.username, &admin.password, &admin.email)
            .map_err(AppError::command)?;
        info!(username = %user.username, "staff account ready");
        Ok(())
    }

    pub(crate) fn persist(&self) -> Result<(), AppError> {
        self.store.persist()?;
        Ok(())
    }
}

fn collaborators(config: &AppConfig) -> Result<Collaborators, AppError> {
    let client = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(concat!("tinysteps/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(AppError::command)?;
    let integrations = &config.integrations;

    Ok(Collaborators {
        mailer: Arc::new(LogMailer),
        mail: config.mail.settings(),
        session_ttl: config.auth.session_ttl(),
        news: Arc::new(NewsApiClient::new(
            client.clone(),
            integrations.news_api_url.clone(),
            integrations.news_api_key.clone(),
        )),
        nutrition: Arc::new(EdamamClient::new(
            client,
            integrations.edamam_api_url.clone(),
            integrations.edamam_app_id.clone(),
            integrations.edamam_app_key.clone(),
        )),
    })
}
