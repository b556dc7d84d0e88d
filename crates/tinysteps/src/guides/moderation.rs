//! Staff review of submitted guides.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use super::domain::{Guide, GuideStatus, GuideType, StatusFilter};
use super::repository::GuideRepository;
use crate::accounts::{User, UserRepository};
use crate::ids::GuideId;
use crate::notifications::{MailSettings, Mailer, NotificationError, NotificationService};
use crate::storage::RepositoryError;
use crate::validation::{self, FieldError};

pub const MAX_REASON_LENGTH: usize = 500;

pub struct ModerationService {
    guides: Arc<dyn GuideRepository>,
    users: Arc<dyn UserRepository>,
    notifications: Arc<NotificationService>,
    mailer: Arc<dyn Mailer>,
    mail: MailSettings,
}

impl ModerationService {
    pub fn new(
        guides: Arc<dyn GuideRepository>,
        users: Arc<dyn UserRepository>,
        notifications: Arc<NotificationService>,
        mailer: Arc<dyn Mailer>,
        mail: MailSettings,
    ) -> Self {
        Self {
            guides,
            users,
            notifications,
            mailer,
            mail,
        }
    }

    /// Publishes the guide; an earlier `published_at` is preserved.
    pub fn approve(
        &self,
        moderator: &User,
        id: GuideId,
        note: Option<&str>,
    ) -> Result<Guide, ModerationError> {
        let mut guide = self.transition(moderator, id, GuideStatus::Approved)?;
        let now = Utc::now();
        guide.status = GuideStatus::Approved;
        guide.approved_at = Some(now);
        guide.published_at.get_or_insert(now);
        guide.rejection_reason = None;
        guide.moderated_by = Some(moderator.id);
        guide.moderation_date = Some(now);
        guide.moderation_notes = Some(
            validation::optional_text("notes", note, MAX_REASON_LENGTH)?
                .unwrap_or_else(|| "Approved by moderator".to_string()),
        );
        guide.updated_at = now;
        self.guides.update_guide(guide.clone())?;

        self.notifications.notify(
            guide.author,
            "Your guide was approved",
            format!("\"{}\" is now published on TinySteps.", guide.title),
        )?;
        let link = self.mail.link(&format!(
            "/api/v1/guides/{}/{}",
            guide.guide_type.as_str(),
            guide.id
        ));
        self.email_author(
            &guide,
            "Your guide has been approved!",
            |name| {
                format!(
                    "Hello {name},\n\nYour guide \"{}\" has been approved and is now published.\n\
                     You can find it here: {link}\n\nThank you for your contribution.\n\nThe TinySteps Team",
                    guide.title
                )
            },
        );
        audit(&guide, "approved", moderator, None);
        Ok(guide)
    }

    /// Rejects with a mandatory reason of at most 500 characters.
    pub fn reject(
        &self,
        moderator: &User,
        id: GuideId,
        reason: &str,
    ) -> Result<Guide, ModerationError> {
        let reason = validation::bounded_text("rejection_reason", reason, 1, MAX_REASON_LENGTH)?;
        let mut guide = self.transition(moderator, id, GuideStatus::Rejected)?;
        let now = Utc::now();
        guide.status = GuideStatus::Rejected;
        guide.rejection_reason = Some(reason.clone());
        guide.moderated_by = Some(moderator.id);
        guide.moderation_date = Some(now);
        guide.moderation_notes = Some("Rejected by moderator".to_string());
        guide.updated_at = now;
        self.guides.update_guide(guide.clone())?;

        self.notifications.notify(
            guide.author,
            "Your guide needs changes",
            format!("\"{}\" was not approved: {}", guide.title, reason),
        )?;
        self.email_author(&guide, "Feedback on your submitted guide", |name| {
            format!(
                "Hello {name},\n\nThank you for submitting \"{}\".\n\
                 We reviewed it and cannot publish it in its current form.\n\n\
                 Reason:\n{reason}\n\nPlease revise the guide and submit it again.\n\nThe TinySteps Team",
                guide.title
            )
        });
        audit(&guide, "rejected", moderator, Some(&reason));
        Ok(guide)
    }

    pub fn pending_count(&self) -> Result<usize, ModerationError> {
        Ok(self.guides.count_with_status(GuideStatus::Pending)?)
    }

    /// Pending guides, newest first.
    pub fn pending(&self) -> Result<Vec<Guide>, ModerationError> {
        self.by_status(StatusFilter::Only(GuideStatus::Pending), None)
    }

    pub fn by_status(
        &self,
        status: StatusFilter,
        guide_type: Option<GuideType>,
    ) -> Result<Vec<Guide>, ModerationError> {
        Ok(self
            .guides
            .guides()?
            .into_iter()
            .filter(|guide| status.admits(guide.status))
            .filter(|guide| guide_type.map_or(true, |wanted| guide.guide_type == wanted))
            .collect())
    }

    fn transition(
        &self,
        moderator: &User,
        id: GuideId,
        next: GuideStatus,
    ) -> Result<Guide, ModerationError> {
        if !moderator.is_staff {
            return Err(ModerationError::Forbidden);
        }
        let guide = self
            .guides
            .fetch_guide(id)?
            .ok_or(ModerationError::NotFound)?;
        if !guide.status.can_transition_to(next) {
            return Err(ModerationError::InvalidTransition {
                from: guide.status,
                to: next,
            });
        }
        Ok(guide)
    }

    fn email_author(&self, guide: &Guide, subject: &str, body: impl FnOnce(&str) -> String) {
        let author = match self.users.fetch(guide.author) {
            Ok(Some(author)) => author,
            Ok(None) => return,
            Err(err) => {
                error!(guide_id = %guide.id, error = %err, "could not load guide author");
                return;
            }
        };
        let email = self.mail.email(
            vec![author.email.clone()],
            subject,
            body(&author.display_name()),
        );
        if let Err(err) = self.mailer.send(email) {
            error!(guide_id = %guide.id, error = %err, "failed to e-mail guide author");
        }
    }
}

fn audit(guide: &Guide, action: &str, moderator: &User, reason: Option<&str>) {
    info!(
        target: "audit",
        guide_id = %guide.id,
        guide_title = %guide.title,
        action,
        moderator = %moderator.username,
        reason = reason.unwrap_or(""),
        "guide moderation"
    );
}

#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error(transparent)]
    Invalid(#[from] FieldError),
    #[error("staff access required")]
    Forbidden,
    #[error("guide not found")]
    NotFound,
    #[error("cannot move a guide from {} to {}", .from.as_str(), .to.as_str())]
    InvalidTransition { from: GuideStatus, to: GuideStatus },
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
