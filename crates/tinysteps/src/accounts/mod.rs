//! User accounts, bearer sessions and password resets.

pub mod domain;
pub mod password;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    Credentials, PasswordResetToken, Profile, ProfileUpdate, ProfileView, Registration, Session,
    User, UserView,
};
pub use repository::{SessionRepository, UserRepository};
pub use router::account_router;
pub use service::{AccountError, AccountService};

#[cfg(test)]
mod tests;
