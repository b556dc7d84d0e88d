use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::age::{age_in_months, format_age, next_milestone_age, AgeRange};
use crate::ids::{ChildId, EventId, MilestoneId, UserId, VaccineCardId, VaccineId};

pub const DEFAULT_CHILD_IMAGE: &str = "/static/res/img/others/default_child.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

/// Child profile owned by one parent account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: ChildId,
    pub owner: UserId,
    pub name: String,
    pub second_name: Option<String>,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub weight: Option<f32>,
    pub height: Option<f32>,
    pub desc: Option<String>,
    pub image_url: Option<String>,
}

impl Child {
    pub fn view(&self, today: NaiveDate) -> ChildView {
        let months = age_in_months(self.birth_date, today);
        ChildView {
            child: self.clone(),
            age_months: months,
            age_display: format_age(months),
            age_range: AgeRange::from_months(months),
            next_milestone_months: next_milestone_age(months),
            image: self
                .image_url
                .clone()
                .unwrap_or_else(|| DEFAULT_CHILD_IMAGE.to_string()),
        }
    }
}

/// Child record enriched with age figures derived for `today`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildView {
    #[serde(flatten)]
    pub child: Child,
    pub age_months: u32,
    pub age_display: String,
    pub age_range: AgeRange,
    pub next_milestone_months: u32,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildDraft {
    pub name: String,
    #[serde(default)]
    pub second_name: Option<String>,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    #[serde(default)]
    pub weight: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: MilestoneId,
    pub child_id: ChildId,
    pub title: String,
    pub achieved_date: NaiveDate,
    pub description: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneDraft {
    pub title: String,
    pub achieved_date: NaiveDate,
    pub description: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Created lazily the first time a child's vaccines are touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineCard {
    pub id: VaccineCardId,
    pub child_id: ChildId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vaccine {
    pub id: VaccineId,
    pub card_id: VaccineCardId,
    pub name: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub administered: bool,
    pub next_dose_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineDraft {
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub administered: bool,
    #[serde(default)]
    pub next_dose_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VaccineCardView {
    #[serde(flatten)]
    pub card: VaccineCard,
    pub vaccines: Vec<Vaccine>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VaccineStatistics {
    pub total: usize,
    pub administered: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Doctor,
    Vaccine,
    Milestone,
    Feeding,
    #[default]
    Other,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Doctor,
        EventType::Vaccine,
        EventType::Milestone,
        EventType::Feeding,
        EventType::Other,
    ];

    pub const fn color(self) -> &'static str {
        match self {
            EventType::Doctor => "#2196f3",
            EventType::Vaccine => "#ff9800",
            EventType::Milestone => "#4caf50",
            EventType::Feeding => "#9c27b0",
            EventType::Other => "#757575",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            EventType::Doctor => "Medical Appointment",
            EventType::Vaccine => "Vaccine",
            EventType::Milestone => "Development Milestone",
            EventType::Feeding => "Feeding",
            EventType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    pub child_id: ChildId,
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub has_reminder: bool,
    pub reminder_minutes: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CalendarEvent {
    pub fn view(&self) -> CalendarEventView {
        CalendarEventView {
            event: self.clone(),
            color: self.event_type.color(),
            type_label: self.event_type.label(),
        }
    }

    pub(crate) fn sort_key(&self) -> (NaiveDate, Option<NaiveTime>, EventId) {
        (self.date, self.time, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEventView {
    #[serde(flatten)]
    pub event: CalendarEvent,
    pub color: &'static str,
    pub type_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEventDraft {
    pub title: String,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub has_reminder: bool,
    #[serde(default)]
    pub reminder_minutes: Option<u32>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEventPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub event_type: Option<EventType>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub has_reminder: Option<bool>,
    #[serde(default)]
    pub reminder_minutes: Option<u32>,
}

/// Drag-and-drop reschedule from the calendar widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMove {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<NaiveTime>,
    #[serde(rename = "allDay", alias = "all_day", default)]
    pub all_day: bool,
}

/// Optional calendar window; bounds that fail to parse are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventRange {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl EventRange {
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start.as_deref().and_then(parse_calendar_bound)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end.as_deref().and_then(parse_calendar_bound)
    }
}

/// Accepts `YYYY-MM-DD` or an ISO datetime and keeps the date part.
pub fn parse_calendar_bound(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split('T').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventStatistics {
    pub doctor: usize,
    pub vaccine: usize,
    pub milestone: usize,
    pub feeding: usize,
    pub other: usize,
    pub total: usize,
}

impl EventStatistics {
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a CalendarEvent>) -> Self {
        let mut stats = Self::default();
        for event in events {
            match event.event_type {
                EventType::Doctor => stats.doctor += 1,
                EventType::Vaccine => stats.vaccine += 1,
                EventType::Milestone => stats.milestone += 1,
                EventType::Feeding => stats.feeding += 1,
                EventType::Other => stats.other += 1,
            }
            stats.total += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_bounds_accept_dates_and_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert_eq!(parse_calendar_bound("2025-03-01"), expected);
        assert_eq!(parse_calendar_bound("2025-03-01T00:00:00+01:00"), expected);
        assert_eq!(parse_calendar_bound("March 1st"), None);
    }

    #[test]
    fn event_type_wire_names_and_colors() {
        let json = serde_json::to_string(&EventType::Doctor).expect("serializes");
        assert_eq!(json, "\"doctor\"");
        assert_eq!(EventType::Vaccine.color(), "#ff9800");
        assert_eq!(EventType::default(), EventType::Other);
    }

    #[test]
    fn move_payload_accepts_camel_case_all_day() {
        let parsed: EventMove =
            serde_json::from_str(r#"{"date":"2025-04-02","allDay":true}"#).expect("parses");
        assert!(parsed.all_day);
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2025, 4, 2));
    }
}
