use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{ContactDraft, ContactRequest};
use super::repository::ContactRepository;
use crate::accounts::User;
use crate::ids::ContactId;
use crate::notifications::{MailSettings, Mailer};
use crate::storage::RepositoryError;
use crate::validation::{self, FieldError};

pub const MAX_MESSAGE_LENGTH: usize = 5000;
const MAX_PHONE_LENGTH: usize = 20;

pub struct ContactService {
    requests: Arc<dyn ContactRepository>,
    mailer: Arc<dyn Mailer>,
    mail: MailSettings,
}

impl ContactService {
    pub fn new(
        requests: Arc<dyn ContactRepository>,
        mailer: Arc<dyn Mailer>,
        mail: MailSettings,
    ) -> Self {
        Self {
            requests,
            mailer,
            mail,
        }
    }

    /// Stores the request, then sends the sender a confirmation.
    ///
    /// A failed confirmation is logged and does not undo the submission.
    pub fn submit(&self, draft: ContactDraft) -> Result<ContactRequest, ContactError> {
        let email = draft.email.trim().to_string();
        if !validation::is_valid_email(&email) {
            return Err(FieldError::new("email", "enter a valid email address").into());
        }
        let request = ContactRequest {
            id: ContactId::UNASSIGNED,
            name: validation::bounded_text("name", &draft.name, 1, 100)?,
            email,
            phone: validation::optional_text("phone", draft.phone.as_deref(), MAX_PHONE_LENGTH)?,
            message: validation::bounded_text("message", &draft.message, 1, MAX_MESSAGE_LENGTH)?,
            created_at: Utc::now(),
        };
        let request = self.requests.insert_request(request)?;
        info!(contact_id = %request.id, "contact request received");

        let confirmation = self.mail.email(
            vec![request.email.clone()],
            "We received your message",
            format!(
                "Hello {},\n\nThank you for contacting TinySteps. We will get back to you soon.\n\nYour message:\n{}",
                request.name, request.message
            ),
        );
        if let Err(err) = self.mailer.send(confirmation) {
            warn!(contact_id = %request.id, error = %err, "contact confirmation not sent");
        }
        Ok(request)
    }

    pub fn list(&self, requester: &User) -> Result<Vec<ContactRequest>, ContactError> {
        require_staff(requester)?;
        Ok(self.requests.requests()?)
    }

    pub fn get(&self, requester: &User, id: ContactId) -> Result<ContactRequest, ContactError> {
        require_staff(requester)?;
        self.requests
            .fetch_request(id)?
            .ok_or(ContactError::NotFound)
    }
}

fn require_staff(user: &User) -> Result<(), ContactError> {
    if user.is_staff {
        Ok(())
    } else {
        Err(ContactError::Forbidden)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error(transparent)]
    Invalid(#[from] FieldError),
    #[error("contact request not found")]
    NotFound,
    #[error("staff access required")]
    Forbidden,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
