use chrono::NaiveDate;

use super::domain::{CalendarEvent, Child, Milestone, Vaccine, VaccineCard};
use crate::ids::{ChildId, EventId, MilestoneId, UserId, VaccineCardId, VaccineId};
use crate::storage::RepositoryError;

/// Child profiles with their milestones and vaccine records.
///
/// Every `insert_*` assigns the identifier. Deleting a child removes its
/// milestones, vaccine card, vaccines and calendar events.
pub trait ChildRepository: Send + Sync {
    fn insert_child(&self, child: Child) -> Result<Child, RepositoryError>;
    fn update_child(&self, child: Child) -> Result<(), RepositoryError>;
    fn fetch_child(&self, id: ChildId) -> Result<Option<Child>, RepositoryError>;
    /// Children of `owner` ordered by name.
    fn children_of(&self, owner: UserId) -> Result<Vec<Child>, RepositoryError>;
    fn delete_child(&self, id: ChildId) -> Result<(), RepositoryError>;

    fn insert_milestone(&self, milestone: Milestone) -> Result<Milestone, RepositoryError>;
    fn fetch_milestone(&self, id: MilestoneId) -> Result<Option<Milestone>, RepositoryError>;
    /// Newest achievement first.
    fn milestones_of(&self, child: ChildId) -> Result<Vec<Milestone>, RepositoryError>;
    fn delete_milestone(&self, id: MilestoneId) -> Result<(), RepositoryError>;

    fn card_of(&self, child: ChildId) -> Result<Option<VaccineCard>, RepositoryError>;
    /// Fails with `Conflict` when the child already has a card.
    fn insert_card(&self, card: VaccineCard) -> Result<VaccineCard, RepositoryError>;
    fn fetch_card(&self, id: VaccineCardId) -> Result<Option<VaccineCard>, RepositoryError>;
    fn insert_vaccine(&self, vaccine: Vaccine) -> Result<Vaccine, RepositoryError>;
    fn update_vaccine(&self, vaccine: Vaccine) -> Result<(), RepositoryError>;
    fn fetch_vaccine(&self, id: VaccineId) -> Result<Option<Vaccine>, RepositoryError>;
    /// Ordered by next dose (undated last), then by date.
    fn vaccines_on(&self, card: VaccineCardId) -> Result<Vec<Vaccine>, RepositoryError>;
    fn delete_vaccine(&self, id: VaccineId) -> Result<(), RepositoryError>;
}

/// Calendar storage, ordered by date then time everywhere.
pub trait CalendarRepository: Send + Sync {
    fn insert_event(&self, event: CalendarEvent) -> Result<CalendarEvent, RepositoryError>;
    fn update_event(&self, event: CalendarEvent) -> Result<(), RepositoryError>;
    fn fetch_event(&self, id: EventId) -> Result<Option<CalendarEvent>, RepositoryError>;
    fn delete_event(&self, id: EventId) -> Result<(), RepositoryError>;
    fn events_of(&self, child: ChildId) -> Result<Vec<CalendarEvent>, RepositoryError>;
    /// Events on `date` that have a reminder switched on, across every child.
    fn reminders_on(&self, date: NaiveDate) -> Result<Vec<CalendarEvent>, RepositoryError>;
}
