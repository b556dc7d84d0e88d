//! Age arithmetic for child profiles.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

const MILESTONE_AGES: [u32; 12] = [1, 2, 4, 6, 9, 12, 15, 18, 24, 36, 48, 60];

/// Whole months between `birth_date` and `today`; zero for future birth dates.
pub fn age_in_months(birth_date: NaiveDate, today: NaiveDate) -> u32 {
    if today <= birth_date {
        return 0;
    }
    let mut months = (today.year() - birth_date.year()) * 12 + today.month() as i32
        - birth_date.month() as i32;
    if today.day() < birth_date.day() {
        months -= 1;
    }
    months.max(0) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgeRange {
    #[serde(rename = "0-6")]
    Newborn,
    #[serde(rename = "6-12")]
    Infant,
    #[serde(rename = "12-24")]
    Toddler,
    #[serde(rename = "24+")]
    Preschool,
}

impl AgeRange {
    pub fn from_months(months: u32) -> Self {
        match months {
            0..=5 => Self::Newborn,
            6..=11 => Self::Infant,
            12..=23 => Self::Toddler,
            _ => Self::Preschool,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Newborn => "0-6",
            Self::Infant => "6-12",
            Self::Toddler => "12-24",
            Self::Preschool => "24+",
        }
    }
}

/// The next checkpoint age in months; children past the last one stay on it.
pub fn next_milestone_age(months: u32) -> u32 {
    MILESTONE_AGES
        .iter()
        .copied()
        .find(|age| months < *age)
        .unwrap_or(MILESTONE_AGES[MILESTONE_AGES.len() - 1])
}

pub fn format_age(months: u32) -> String {
    fn plural(count: u32, unit: &str) -> String {
        if count == 1 {
            format!("{count} {unit}")
        } else {
            format!("{count} {unit}s")
        }
    }

    let years = months / 12;
    let remaining = months % 12;
    match (years, remaining) {
        (0, _) => plural(months, "month"),
        (_, 0) => plural(years, "year"),
        _ => format!("{}, {}", plural(years, "year"), plural(remaining, "month")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn months_count_only_completed_months() {
        assert_eq!(age_in_months(date(2024, 1, 15), date(2024, 2, 14)), 0);
        assert_eq!(age_in_months(date(2024, 1, 15), date(2024, 2, 15)), 1);
        assert_eq!(age_in_months(date(2023, 11, 30), date(2025, 1, 29)), 13);
        assert_eq!(age_in_months(date(2026, 1, 1), date(2025, 1, 1)), 0);
    }

    #[test]
    fn ranges_follow_boundaries() {
        assert_eq!(AgeRange::from_months(0), AgeRange::Newborn);
        assert_eq!(AgeRange::from_months(6), AgeRange::Infant);
        assert_eq!(AgeRange::from_months(12).label(), "12-24");
        assert_eq!(AgeRange::from_months(40), AgeRange::Preschool);
    }

    #[test]
    fn next_milestone_caps_at_five_years() {
        assert_eq!(next_milestone_age(0), 1);
        assert_eq!(next_milestone_age(6), 9);
        assert_eq!(next_milestone_age(70), 60);
    }

    #[test]
    fn format_age_reads_naturally() {
        assert_eq!(format_age(1), "1 month");
        assert_eq!(format_age(5), "5 months");
        assert_eq!(format_age(12), "1 year");
        assert_eq!(format_age(14), "1 year, 2 months");
        assert_eq!(format_age(25), "2 years, 1 month");
    }
}
