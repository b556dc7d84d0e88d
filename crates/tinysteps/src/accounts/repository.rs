use uuid::Uuid;

use super::domain::{PasswordResetToken, Session, User};
use crate::ids::UserId;
use crate::storage::RepositoryError;

/// Account storage. `insert` assigns the identifier and rejects duplicate usernames.
pub trait UserRepository: Send + Sync {
    fn insert(&self, user: User) -> Result<User, RepositoryError>;
    fn update(&self, user: User) -> Result<(), RepositoryError>;
    fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    /// Every account, newest first.
    fn list(&self) -> Result<Vec<User>, RepositoryError>;
}

/// Bearer sessions and password reset tokens.
pub trait SessionRepository: Send + Sync {
    fn insert_session(&self, session: Session) -> Result<(), RepositoryError>;
    fn fetch_session(&self, token: &str) -> Result<Option<Session>, RepositoryError>;
    fn delete_session(&self, token: &str) -> Result<(), RepositoryError>;
    fn insert_reset_token(&self, token: PasswordResetToken) -> Result<(), RepositoryError>;
    fn fetch_reset_token(&self, token: &Uuid) -> Result<Option<PasswordResetToken>, RepositoryError>;
    fn update_reset_token(&self, token: PasswordResetToken) -> Result<(), RepositoryError>;
}
