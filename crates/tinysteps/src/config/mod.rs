use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use chrono::Duration;

use crate::notifications::MailSettings;

pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 14;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub mail: MailConfig,
    pub auth: AuthConfig,
    pub integrations: IntegrationsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let session_ttl_hours = match optional("TINYSTEPS_SESSION_TTL_HOURS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|hours| *hours > 0)
                .ok_or(ConfigError::InvalidSessionTtl)?,
            None => DEFAULT_SESSION_TTL_HOURS,
        };

        let admin = match (
            optional("TINYSTEPS_ADMIN_USERNAME"),
            optional("TINYSTEPS_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(AdminAccount {
                email: optional("TINYSTEPS_ADMIN_EMAIL")
                    .unwrap_or_else(|| format!("{username}@tinysteps.local")),
                username,
                password,
            }),
            _ => None,
        };

        let defaults = MailSettings::default();
        let mail = MailConfig {
            site_url: optional("TINYSTEPS_SITE_URL").unwrap_or(defaults.site_url),
            from_address: optional("TINYSTEPS_FROM_EMAIL").unwrap_or(defaults.from_address),
            admin_emails: optional("TINYSTEPS_ADMIN_EMAILS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
        };

        let integrations = IntegrationsConfig {
            news_api_url: optional("NEWS_API_URL")
                .unwrap_or_else(|| "https://newsapi.org".to_string()),
            news_api_key: optional("NEWS_API_KEY"),
            edamam_api_url: optional("EDAMAM_API_URL")
                .unwrap_or_else(|| "https://api.edamam.com".to_string()),
            edamam_app_id: optional("EDAMAM_APP_ID"),
            edamam_app_key: optional("EDAMAM_APP_KEY"),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig {
                data_file: optional("TINYSTEPS_DATA_FILE").map(PathBuf::from),
            },
            mail,
            auth: AuthConfig {
                session_ttl_hours,
                admin,
            },
            integrations,
        })
    }
}

/// Unset and blank variables are treated alike.
fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the in-memory store keeps its snapshot, if anywhere.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub site_url: String,
    pub from_address: String,
    pub admin_emails: Vec<String>,
}

impl MailConfig {
    pub fn settings(&self) -> MailSettings {
        MailSettings {
            from_address: self.from_address.clone(),
            site_url: self.site_url.clone(),
            admin_emails: self.admin_emails.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub session_ttl_hours: i64,
    pub admin: Option<AdminAccount>,
}

impl AuthConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours)
    }
}

/// Staff account created or promoted on startup.
#[derive(Clone)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminAccount")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

/// Third-party news and nutrition endpoints.
#[derive(Clone)]
pub struct IntegrationsConfig {
    pub news_api_url: String,
    pub news_api_key: Option<String>,
    pub edamam_api_url: String,
    pub edamam_app_id: Option<String>,
    pub edamam_app_key: Option<String>,
}

impl fmt::Debug for IntegrationsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationsConfig")
            .field("news_api_url", &self.news_api_url)
            .field("news_api_key", &self.news_api_key.as_ref().map(|_| "<set>"))
            .field("edamam_api_url", &self.edamam_api_url)
            .field("edamam_app_id", &self.edamam_app_id)
            .field("edamam_app_key", &self.edamam_app_key.as_ref().map(|_| "<set>"))
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSessionTtl,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSessionTtl => {
                write!(f, "TINYSTEPS_SESSION_TTL_HOURS must be a positive number of hours")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidSessionTtl => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    const VARIABLES: [&str; 16] = [
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "TINYSTEPS_DATA_FILE",
        "TINYSTEPS_SITE_URL",
        "TINYSTEPS_FROM_EMAIL",
        "TINYSTEPS_ADMIN_EMAILS",
        "TINYSTEPS_SESSION_TTL_HOURS",
        "TINYSTEPS_ADMIN_USERNAME",
        "TINYSTEPS_ADMIN_PASSWORD",
        "TINYSTEPS_ADMIN_EMAIL",
        "NEWS_API_KEY",
        "NEWS_API_URL",
        "EDAMAM_APP_ID",
        "EDAMAM_APP_KEY",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in VARIABLES {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.storage.data_file.is_none());
        assert_eq!(config.auth.session_ttl(), Duration::hours(336));
        assert!(config.auth.admin.is_none());
        assert_eq!(config.mail.site_url, "https://tinysteps.com");
        assert!(config.integrations.news_api_key.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn admin_emails_split_on_commas() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TINYSTEPS_ADMIN_EMAILS", "a@tinysteps.test, b@tinysteps.test,,");
        env::set_var("TINYSTEPS_ADMIN_USERNAME", "admin");
        env::set_var("TINYSTEPS_ADMIN_PASSWORD", "changeme1");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.mail.settings().admin_emails,
            vec!["a@tinysteps.test".to_string(), "b@tinysteps.test".to_string()]
        );
        let admin = config.auth.admin.expect("admin configured");
        assert_eq!(admin.email, "admin@tinysteps.local");
        assert!(!format!("{admin:?}").contains("changeme1"));
        reset_env();
    }

    #[test]
    fn rejects_non_positive_session_ttl() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TINYSTEPS_SESSION_TTL_HOURS", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidSessionTtl)
        ));
        reset_env();
    }
}
