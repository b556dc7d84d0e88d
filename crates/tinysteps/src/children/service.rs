use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, info};

use super::domain::{
    CalendarEvent, CalendarEventDraft, CalendarEventPatch, Child, ChildDraft, EventMove,
    EventRange, EventStatistics, Milestone, MilestoneDraft, Vaccine, VaccineCard,
    VaccineCardView, VaccineDraft, VaccineStatistics,
};
use super::repository::{CalendarRepository, ChildRepository};
use crate::ids::{ChildId, EventId, MilestoneId, UserId, VaccineCardId, VaccineId};
use crate::storage::RepositoryError;
use crate::validation::{self, FieldError};

pub const UPCOMING_EVENTS_DAYS: i64 = 7;

/// Child profiles, milestones, vaccine cards and calendars.
///
/// Every operation is scoped to the owning account: another parent's child is
/// reported as missing rather than forbidden.
pub struct ChildService {
    children: Arc<dyn ChildRepository>,
    calendar: Arc<dyn CalendarRepository>,
}

impl ChildService {
    pub fn new(children: Arc<dyn ChildRepository>, calendar: Arc<dyn CalendarRepository>) -> Self {
        Self { children, calendar }
    }

    pub fn list(&self, owner: UserId) -> Result<Vec<Child>, ChildServiceError> {
        Ok(self.children.children_of(owner)?)
    }

    pub fn get(&self, owner: UserId, id: ChildId) -> Result<Child, ChildServiceError> {
        self.children
            .fetch_child(id)?
            .filter(|child| child.owner == owner)
            .ok_or(ChildServiceError::ChildNotFound)
    }

    pub fn create(
        &self,
        owner: UserId,
        draft: ChildDraft,
        today: NaiveDate,
    ) -> Result<Child, ChildServiceError> {
        let child = self.validated_child(owner, ChildId::UNASSIGNED, draft, today)?;
        let child = self.children.insert_child(child)?;
        info!(child_id = %child.id, owner = %owner, "child profile created");
        Ok(child)
    }

    pub fn update(
        &self,
        owner: UserId,
        id: ChildId,
        draft: ChildDraft,
        today: NaiveDate,
    ) -> Result<Child, ChildServiceError> {
        self.get(owner, id)?;
        let child = self.validated_child(owner, id, draft, today)?;
        self.children.update_child(child.clone())?;
        Ok(child)
    }

    pub fn delete(&self, owner: UserId, id: ChildId) -> Result<(), ChildServiceError> {
        self.get(owner, id)?;
        self.children.delete_child(id)?;
        info!(child_id = %id, owner = %owner, "child profile deleted");
        Ok(())
    }

    fn validated_child(
        &self,
        owner: UserId,
        id: ChildId,
        draft: ChildDraft,
        today: NaiveDate,
    ) -> Result<Child, ChildServiceError> {
        let name = validation::bounded_text("name", &draft.name, 1, 50)?;
        if draft.birth_date > today {
            return Err(FieldError::new("birth_date", "birth date cannot be in the future").into());
        }
        for (field, value) in [("weight", draft.weight), ("height", draft.height)] {
            if matches!(value, Some(measure) if !(measure.is_finite() && measure > 0.0)) {
                return Err(FieldError::new(field, "must be a positive number").into());
            }
        }

        let duplicate = self
            .children
            .children_of(owner)?
            .into_iter()
            .any(|existing| existing.id != id && existing.name.eq_ignore_ascii_case(&name));
        if duplicate {
            return Err(ChildServiceError::DuplicateName(name));
        }

        Ok(Child {
            id,
            owner,
            name,
            second_name: validation::optional_text("second_name", draft.second_name.as_deref(), 50)?,
            birth_date: draft.birth_date,
            gender: draft.gender,
            weight: draft.weight,
            height: draft.height,
            desc: validation::optional_text("desc", draft.desc.as_deref(), 2000)?,
            image_url: validation::optional_url("image_url", draft.image_url.as_deref())?,
        })
    }

    pub fn add_milestone(
        &self,
        owner: UserId,
        child_id: ChildId,
        draft: MilestoneDraft,
    ) -> Result<Milestone, ChildServiceError> {
        let child = self.get(owner, child_id)?;
        if draft.achieved_date < child.birth_date {
            return Err(
                FieldError::new("achieved_date", "cannot be earlier than the birth date").into(),
            );
        }

        let milestone = Milestone {
            id: MilestoneId::UNASSIGNED,
            child_id,
            title: validation::bounded_text("title", &draft.title, 1, 100)?,
            achieved_date: draft.achieved_date,
            description: validation::bounded_text("description", &draft.description, 1, 2000)?,
            photo_url: validation::optional_url("photo_url", draft.photo_url.as_deref())?,
        };
        Ok(self.children.insert_milestone(milestone)?)
    }

    pub fn milestones(
        &self,
        owner: UserId,
        child_id: ChildId,
    ) -> Result<Vec<Milestone>, ChildServiceError> {
        self.get(owner, child_id)?;
        Ok(self.children.milestones_of(child_id)?)
    }

    pub fn delete_milestone(
        &self,
        owner: UserId,
        child_id: ChildId,
        milestone_id: MilestoneId,
    ) -> Result<(), ChildServiceError> {
        self.get(owner, child_id)?;
        self.children
            .fetch_milestone(milestone_id)?
            .filter(|milestone| milestone.child_id == child_id)
            .ok_or(ChildServiceError::MilestoneNotFound)?;
        Ok(self.children.delete_milestone(milestone_id)?)
    }

    pub fn vaccine_card(
        &self,
        owner: UserId,
        child_id: ChildId,
    ) -> Result<VaccineCard, ChildServiceError> {
        self.get(owner, child_id)?;
        if let Some(card) = self.children.card_of(child_id)? {
            return Ok(card);
        }

        let now = Utc::now();
        let card = VaccineCard {
            id: VaccineCardId::UNASSIGNED,
            child_id,
            created_at: now,
            updated_at: now,
        };
        match self.children.insert_card(card) {
            Ok(card) => {
                debug!(child_id = %child_id, "vaccine card created");
                Ok(card)
            }
            Err(RepositoryError::Conflict) => self
                .children
                .card_of(child_id)?
                .ok_or(ChildServiceError::Repository(RepositoryError::NotFound)),
            Err(other) => Err(other.into()),
        }
    }

    pub fn vaccine_card_view(
        &self,
        owner: UserId,
        child_id: ChildId,
    ) -> Result<VaccineCardView, ChildServiceError> {
        let card = self.vaccine_card(owner, child_id)?;
        let vaccines = self.children.vaccines_on(card.id)?;
        Ok(VaccineCardView { card, vaccines })
    }

    pub fn vaccines(
        &self,
        owner: UserId,
        child_id: ChildId,
    ) -> Result<Vec<Vaccine>, ChildServiceError> {
        let card = self.vaccine_card(owner, child_id)?;
        Ok(self.children.vaccines_on(card.id)?)
    }

    pub fn add_vaccine(
        &self,
        owner: UserId,
        child_id: ChildId,
        draft: VaccineDraft,
    ) -> Result<Vaccine, ChildServiceError> {
        let card = self.vaccine_card(owner, child_id)?;
        if matches!(draft.next_dose_date, Some(next) if next < draft.date) {
            return Err(
                FieldError::new("next_dose_date", "cannot be earlier than the dose date").into(),
            );
        }

        let vaccine = Vaccine {
            id: VaccineId::UNASSIGNED,
            card_id: card.id,
            name: validation::bounded_text("name", &draft.name, 1, 100)?,
            date: draft.date,
            notes: validation::optional_text("notes", draft.notes.as_deref(), 2000)?,
            administered: draft.administered,
            next_dose_date: draft.next_dose_date,
        };
        Ok(self.children.insert_vaccine(vaccine)?)
    }

    pub fn vaccine_statistics(
        &self,
        owner: UserId,
        child_id: ChildId,
    ) -> Result<VaccineStatistics, ChildServiceError> {
        let vaccines = self.vaccines(owner, child_id)?;
        let total = vaccines.len();
        let administered = vaccines.iter().filter(|vaccine| vaccine.administered).count();
        Ok(VaccineStatistics {
            total,
            administered,
            pending: total - administered,
        })
    }

    /// Doses whose next date falls within `days` of `today`, soonest first.
    pub fn upcoming_vaccines(
        &self,
        owner: UserId,
        child_id: ChildId,
        today: NaiveDate,
        days: i64,
        limit: usize,
    ) -> Result<Vec<Vaccine>, ChildServiceError> {
        let end = today + validation::window_days(days);
        let mut upcoming: Vec<Vaccine> = self
            .vaccines(owner, child_id)?
            .into_iter()
            .filter(|vaccine| matches!(vaccine.next_dose_date, Some(next) if next >= today && next <= end))
            .collect();
        upcoming.sort_by_key(|vaccine| (vaccine.next_dose_date, vaccine.id));
        upcoming.truncate(limit);
        Ok(upcoming)
    }

    /// Unlike the child lookups, touching another parent's vaccine is a permission error.
    pub fn mark_vaccine_administered(
        &self,
        owner: UserId,
        vaccine_id: VaccineId,
    ) -> Result<Vaccine, ChildServiceError> {
        let mut vaccine = self
            .children
            .fetch_vaccine(vaccine_id)?
            .ok_or(ChildServiceError::VaccineNotFound)?;
        let card = self
            .children
            .fetch_card(vaccine.card_id)?
            .ok_or(ChildServiceError::VaccineNotFound)?;
        let child = self
            .children
            .fetch_child(card.child_id)?
            .ok_or(ChildServiceError::ChildNotFound)?;
        if child.owner != owner {
            return Err(ChildServiceError::Forbidden);
        }

        vaccine.administered = true;
        self.children.update_vaccine(vaccine.clone())?;
        Ok(vaccine)
    }

    pub fn delete_vaccine(
        &self,
        owner: UserId,
        child_id: ChildId,
        vaccine_id: VaccineId,
    ) -> Result<(), ChildServiceError> {
        let card = self.vaccine_card(owner, child_id)?;
        self.children
            .fetch_vaccine(vaccine_id)?
            .filter(|vaccine| vaccine.card_id == card.id)
            .ok_or(ChildServiceError::VaccineNotFound)?;
        Ok(self.children.delete_vaccine(vaccine_id)?)
    }

    pub fn add_event(
        &self,
        owner: UserId,
        child_id: ChildId,
        draft: CalendarEventDraft,
    ) -> Result<CalendarEvent, ChildServiceError> {
        self.get(owner, child_id)?;
        let now = Utc::now();
        let event = CalendarEvent {
            id: EventId::UNASSIGNED,
            child_id,
            title: validation::bounded_text("title", &draft.title, 1, 255)?,
            event_type: draft.event_type,
            date: draft.date,
            time: draft.time,
            location: validation::optional_text("location", draft.location.as_deref(), 255)?,
            description: validation::optional_text(
                "description",
                draft.description.as_deref(),
                2000,
            )?,
            has_reminder: draft.has_reminder,
            reminder_minutes: draft.reminder_minutes.filter(|minutes| *minutes > 0),
            created_at: now,
            updated_at: now,
        };
        Ok(self.calendar.insert_event(event)?)
    }

    pub fn events(
        &self,
        owner: UserId,
        child_id: ChildId,
        range: &EventRange,
    ) -> Result<Vec<CalendarEvent>, ChildServiceError> {
        self.get(owner, child_id)?;
        let start = range.start_date();
        let end = range.end_date();
        Ok(self
            .calendar
            .events_of(child_id)?
            .into_iter()
            .filter(|event| start.map_or(true, |start| event.date >= start))
            .filter(|event| end.map_or(true, |end| event.date <= end))
            .collect())
    }

    pub fn get_event(&self, owner: UserId, id: EventId) -> Result<CalendarEvent, ChildServiceError> {
        let event = self
            .calendar
            .fetch_event(id)?
            .ok_or(ChildServiceError::EventNotFound)?;
        match self.get(owner, event.child_id) {
            Ok(_) => Ok(event),
            Err(ChildServiceError::ChildNotFound) => Err(ChildServiceError::EventNotFound),
            Err(other) => Err(other),
        }
    }

    pub fn update_event(
        &self,
        owner: UserId,
        id: EventId,
        patch: CalendarEventPatch,
    ) -> Result<CalendarEvent, ChildServiceError> {
        let mut event = self.get_event(owner, id)?;
        if let Some(title) = patch.title {
            event.title = validation::bounded_text("title", &title, 1, 255)?;
        }
        if let Some(event_type) = patch.event_type {
            event.event_type = event_type;
        }
        if let Some(date) = patch.date {
            event.date = date;
        }
        if let Some(time) = patch.time {
            event.time = Some(time);
        }
        if patch.location.is_some() {
            event.location = validation::optional_text("location", patch.location.as_deref(), 255)?;
        }
        if patch.description.is_some() {
            event.description =
                validation::optional_text("description", patch.description.as_deref(), 2000)?;
        }
        if let Some(has_reminder) = patch.has_reminder {
            event.has_reminder = has_reminder;
        }
        if let Some(minutes) = patch.reminder_minutes {
            event.reminder_minutes = Some(minutes).filter(|minutes| *minutes > 0);
        }
        event.updated_at = Utc::now();
        self.calendar.update_event(event.clone())?;
        Ok(event)
    }

    /// An all-day drop clears the time; otherwise a supplied time replaces it.
    pub fn move_event(
        &self,
        owner: UserId,
        id: EventId,
        movement: EventMove,
    ) -> Result<CalendarEvent, ChildServiceError> {
        let mut event = self.get_event(owner, id)?;
        if let Some(date) = movement.date {
            event.date = date;
        }
        if movement.all_day {
            event.time = None;
        } else if let Some(time) = movement.time {
            event.time = Some(time);
        }
        event.updated_at = Utc::now();
        self.calendar.update_event(event.clone())?;
        Ok(event)
    }

    pub fn delete_event(&self, owner: UserId, id: EventId) -> Result<(), ChildServiceError> {
        self.get_event(owner, id)?;
        Ok(self.calendar.delete_event(id)?)
    }

    pub fn event_statistics(
        &self,
        owner: UserId,
        child_id: ChildId,
    ) -> Result<EventStatistics, ChildServiceError> {
        self.get(owner, child_id)?;
        let events = self.calendar.events_of(child_id)?;
        Ok(EventStatistics::from_events(&events))
    }

    /// Reminder-enabled events between `today` and `today + days`.
    pub fn upcoming_reminders(
        &self,
        owner: UserId,
        child_id: ChildId,
        today: NaiveDate,
        days: i64,
        limit: usize,
    ) -> Result<Vec<CalendarEvent>, ChildServiceError> {
        let end = today + validation::window_days(days);
        let mut reminders: Vec<CalendarEvent> = self
            .events(owner, child_id, &EventRange::default())?
            .into_iter()
            .filter(|event| event.has_reminder && event.date >= today && event.date <= end)
            .collect();
        reminders.truncate(limit);
        Ok(reminders)
    }

    /// Every event in the coming week, reminder or not.
    pub fn upcoming_events(
        &self,
        owner: UserId,
        child_id: ChildId,
        today: NaiveDate,
    ) -> Result<Vec<CalendarEvent>, ChildServiceError> {
        let end = today + Duration::days(UPCOMING_EVENTS_DAYS);
        Ok(self
            .events(owner, child_id, &EventRange::default())?
            .into_iter()
            .filter(|event| event.date >= today && event.date <= end)
            .collect())
    }

    pub fn has_events(&self, owner: UserId, child_id: ChildId) -> Result<bool, ChildServiceError> {
        self.get(owner, child_id)?;
        Ok(!self.calendar.events_of(child_id)?.is_empty())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChildServiceError {
    #[error(transparent)]
    Invalid(#[from] FieldError),
    #[error("you already have a child named {0}")]
    DuplicateName(String),
    #[error("child not found or not accessible")]
    ChildNotFound,
    #[error("milestone not found")]
    MilestoneNotFound,
    #[error("vaccine not found")]
    VaccineNotFound,
    #[error("event not found")]
    EventNotFound,
    #[error("you do not have permission to modify this vaccine")]
    Forbidden,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
