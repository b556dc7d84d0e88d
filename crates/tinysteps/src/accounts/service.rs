use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{error, info};
use uuid::Uuid;

use super::domain::{
    Credentials, PasswordResetToken, Profile, ProfileUpdate, Registration, Session, User,
};
use super::password::{hash_password, verify_password};
use super::repository::{SessionRepository, UserRepository};
use crate::ids::UserId;
use crate::notifications::{MailSettings, Mailer};
use crate::storage::RepositoryError;
use crate::validation::{self, FieldError};

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_USERNAME_LENGTH: usize = 150;

/// Registration, bearer sessions, profiles and password resets.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    mailer: Arc<dyn Mailer>,
    mail: MailSettings,
    session_ttl: Duration,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        mailer: Arc<dyn Mailer>,
        mail: MailSettings,
        session_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            mailer,
            mail,
            session_ttl,
        }
    }

    pub fn register(&self, registration: Registration) -> Result<User, AccountError> {
        self.create_account(registration, false)
    }

    /// Creates or promotes the configured administrator account.
    pub fn ensure_staff_account(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<User, AccountError> {
        if let Some(mut existing) = self.users.find_by_username(username)? {
            if !existing.is_staff {
                existing.is_staff = true;
                self.users.update(existing.clone())?;
                info!(%username, "existing account promoted to staff");
            }
            return Ok(existing);
        }

        let user = self.create_account(
            Registration {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                first_name: None,
                last_name: None,
            },
            true,
        )?;
        info!(%username, "staff account created");
        Ok(user)
    }

    fn create_account(
        &self,
        registration: Registration,
        is_staff: bool,
    ) -> Result<User, AccountError> {
        let username = registration.username.trim().to_string();
        if username.is_empty()
            || username.chars().count() > MAX_USERNAME_LENGTH
            || !username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "@.+-_".contains(c))
        {
            return Err(FieldError::new(
                "username",
                "use up to 150 letters, digits and @/./+/-/_ only",
            )
            .into());
        }

        let email = normalize_email(&registration.email)?;
        if !validation::is_strong_password(&registration.password, MIN_PASSWORD_LENGTH) {
            return Err(FieldError::new(
                "password",
                "use at least 8 characters including a letter and a digit",
            )
            .into());
        }

        if self.users.find_by_username(&username)?.is_some() {
            return Err(AccountError::UsernameTaken);
        }
        if self.users.find_by_email(&email)?.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let user = User {
            id: UserId::UNASSIGNED,
            username,
            email,
            first_name: registration.first_name.unwrap_or_default().trim().to_string(),
            last_name: registration.last_name.unwrap_or_default().trim().to_string(),
            password_hash: hash_password(&registration.password),
            is_staff,
            date_joined: Utc::now(),
            profile: Profile::default(),
        };

        match self.users.insert(user) {
            Ok(user) => Ok(user),
            Err(RepositoryError::Conflict) => Err(AccountError::UsernameTaken),
            Err(other) => Err(other.into()),
        }
    }

    pub fn login(&self, credentials: Credentials) -> Result<Session, AccountError> {
        let user = self
            .users
            .find_by_username(credentials.username.trim())?
            .filter(|user| verify_password(&credentials.password, &user.password_hash))
            .ok_or(AccountError::InvalidCredentials)?;

        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            user_id: user.id,
            created_at: now,
            expires_at: now + self.session_ttl,
        };
        self.sessions.insert_session(session.clone())?;
        info!(username = %user.username, "user logged in");
        Ok(session)
    }

    pub fn logout(&self, token: &str) -> Result<(), AccountError> {
        match self.sessions.delete_session(token) {
            Ok(()) | Err(RepositoryError::NotFound) => Ok(()),
            Err(other) => Err(other.into()),
        }
    }

    /// Resolves a bearer token to its account, dropping expired sessions.
    pub fn authenticate(&self, token: &str) -> Result<User, AccountError> {
        let session = self
            .sessions
            .fetch_session(token)?
            .ok_or(AccountError::Unauthenticated)?;

        if session.is_expired(Utc::now()) {
            self.sessions.delete_session(token)?;
            return Err(AccountError::Unauthenticated);
        }

        self.users
            .fetch(session.user_id)?
            .ok_or(AccountError::Unauthenticated)
    }

    pub fn get(&self, id: UserId) -> Result<User, AccountError> {
        self.users.fetch(id)?.ok_or(AccountError::NotFound)
    }

    pub fn list_users(&self, requester: &User) -> Result<Vec<User>, AccountError> {
        if !requester.is_staff {
            return Err(AccountError::Forbidden);
        }
        Ok(self.users.list()?)
    }

    pub fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<User, AccountError> {
        let mut user = self.get(user_id)?;

        if let Some(email) = update.email {
            let email = normalize_email(&email)?;
            if email != user.email {
                if self.users.find_by_email(&email)?.is_some() {
                    return Err(AccountError::EmailTaken);
                }
                user.email = email;
            }
        }
        if let Some(first_name) = update.first_name {
            user.first_name = validation::bounded_text("first_name", &first_name, 0, 150)?;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = validation::bounded_text("last_name", &last_name, 0, 150)?;
        }
        if update.bio.is_some() {
            user.profile.bio = validation::optional_text("bio", update.bio.as_deref(), 2000)?;
        }
        if update.image_url.is_some() {
            user.profile.image_url =
                validation::optional_url("image_url", update.image_url.as_deref())?;
        }

        self.users.update(user.clone())?;
        Ok(user)
    }

    /// Issues a reset link; unknown addresses are accepted silently.
    pub fn request_password_reset(&self, email: &str) -> Result<(), AccountError> {
        let Some(user) = self.users.find_by_email(email.trim())? else {
            return Ok(());
        };

        let token = PasswordResetToken {
            token: Uuid::new_v4(),
            user_id: user.id,
            created_at: Utc::now(),
            is_used: false,
        };
        self.sessions.insert_reset_token(token.clone())?;

        let link = self.mail.link(&format!("/password-reset/{}/", token.token));
        let body = format!(
            "Hello {},\n\nWe received a request to reset your TinySteps password.\n\
             Follow this link within 24 hours to choose a new one:\n{link}\n\n\
             If you did not ask for this, you can ignore this message.\n\nThe TinySteps Team",
            user.display_name()
        );
        let email = self
            .mail
            .email(vec![user.email.clone()], "Reset your TinySteps password", body);
        if let Err(err) = self.mailer.send(email) {
            error!(user_id = %user.id, error = %err, "failed to send password reset e-mail");
        }
        Ok(())
    }

    pub fn confirm_password_reset(
        &self,
        token: &Uuid,
        new_password: &str,
    ) -> Result<(), AccountError> {
        let mut reset = self
            .sessions
            .fetch_reset_token(token)?
            .ok_or(AccountError::InvalidResetToken)?;
        if reset.is_used || reset.is_expired(Utc::now()) {
            return Err(AccountError::InvalidResetToken);
        }
        if !validation::is_strong_password(new_password, MIN_PASSWORD_LENGTH) {
            return Err(FieldError::new(
                "password",
                "use at least 8 characters including a letter and a digit",
            )
            .into());
        }

        let mut user = self.get(reset.user_id)?;
        user.password_hash = hash_password(new_password);
        self.users.update(user)?;

        reset.is_used = true;
        self.sessions.update_reset_token(reset)?;
        Ok(())
    }
}

fn normalize_email(raw: &str) -> Result<String, FieldError> {
    let email = raw.trim().to_string();
    if validation::is_valid_email(&email) {
        Ok(email)
    } else {
        Err(FieldError::new("email", "enter a valid e-mail address"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error(transparent)]
    Invalid(#[from] FieldError),
    #[error("a user with that username already exists")]
    UsernameTaken,
    #[error("a user with that e-mail already exists")]
    EmailTaken,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("authentication required")]
    Unauthenticated,
    #[error("staff access required")]
    Forbidden,
    #[error("user not found")]
    NotFound,
    #[error("password reset link is invalid or has expired")]
    InvalidResetToken,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
