use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::info;

/// Outbound message handed to a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("no recipients")]
    NoRecipients,
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}

/// Transport seam for confirmation, moderation and reset e-mails.
pub trait Mailer: Send + Sync {
    fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// Sender identity and link base shared by every e-mail the service writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub from_address: String,
    pub site_url: String,
    pub admin_emails: Vec<String>,
}

impl MailSettings {
    pub fn link(&self, path: &str) -> String {
        format!("{}{}", self.site_url.trim_end_matches('/'), path)
    }

    pub fn email(&self, to: Vec<String>, subject: impl Into<String>, body: impl Into<String>) -> OutgoingEmail {
        OutgoingEmail {
            from: self.from_address.clone(),
            to,
            subject: subject.into(),
            body: body.into(),
        }
    }
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            from_address: "no-reply@tinysteps.com".to_string(),
            site_url: "https://tinysteps.com".to_string(),
            admin_emails: Vec::new(),
        }
    }
}

/// Writes each message to the tracing pipeline instead of an SMTP relay.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        if email.to.is_empty() {
            return Err(MailError::NoRecipients);
        }
        info!(
            target: "mail",
            from = %email.from,
            to = %email.to.join(","),
            subject = %email.subject,
            "e-mail dispatched"
        );
        Ok(())
    }
}

/// Keeps every message in memory so callers can assert on them.
#[derive(Debug, Default, Clone)]
pub struct MemoryMailer {
    outbox: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl MemoryMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.outbox.lock().expect("outbox mutex poisoned").clone()
    }
}

impl Mailer for MemoryMailer {
    fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        if email.to.is_empty() {
            return Err(MailError::NoRecipients);
        }
        self.outbox
            .lock()
            .expect("outbox mutex poisoned")
            .push(email);
        Ok(())
    }
}
