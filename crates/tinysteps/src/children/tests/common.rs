use chrono::NaiveDate;

use crate::children::{CalendarEventDraft, ChildDraft, EventType, Gender, VaccineDraft};

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    date(2025, 6, 1)
}

pub(super) fn child_draft(name: &str) -> ChildDraft {
    ChildDraft {
        name: name.to_string(),
        second_name: None,
        birth_date: date(2024, 3, 10),
        gender: Gender::Female,
        weight: Some(7.4),
        height: Some(66.0),
        desc: None,
        image_url: None,
    }
}

pub(super) fn vaccine_draft(name: &str, dose: NaiveDate, next: Option<NaiveDate>) -> VaccineDraft {
    VaccineDraft {
        name: name.to_string(),
        date: dose,
        notes: None,
        administered: false,
        next_dose_date: next,
    }
}

pub(super) fn event_draft(title: &str, on: NaiveDate, has_reminder: bool) -> CalendarEventDraft {
    CalendarEventDraft {
        title: title.to_string(),
        event_type: EventType::Doctor,
        date: on,
        time: None,
        location: None,
        description: None,
        has_reminder,
        reminder_minutes: Some(30),
    }
}
