//! Child profiles, milestones, vaccine cards and the family calendar.

pub mod age;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use age::{age_in_months, format_age, next_milestone_age, AgeRange};
pub use domain::{
    CalendarEvent, CalendarEventDraft, CalendarEventPatch, CalendarEventView, Child, ChildDraft,
    ChildView, EventMove, EventRange, EventStatistics, EventType, Gender, Milestone,
    MilestoneDraft, Vaccine, VaccineCard, VaccineCardView, VaccineDraft, VaccineStatistics,
};
pub use repository::{CalendarRepository, ChildRepository};
pub use router::child_router;
pub use service::{ChildService, ChildServiceError};
