//! Field checks shared by every submission type.

use std::sync::OnceLock;

use chrono::Duration;
use regex::Regex;

/// Widest day window accepted for look-ahead and look-back queries.
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// A rejected field, reported back to API clients under `details`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
            .expect("email pattern compiles")
    })
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^https?://(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$")
            .expect("url pattern compiles")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && email_pattern().is_match(email)
}

pub fn is_valid_url(url: &str) -> bool {
    url_pattern().is_match(url)
}

/// At least `min_length` characters with one letter and one digit.
pub fn is_strong_password(password: &str, min_length: usize) -> bool {
    password.chars().count() >= min_length
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_alphabetic())
}

/// Clamps a caller-supplied number of days into `0..=MAX_WINDOW_DAYS`.
pub fn window_days(days: i64) -> Duration {
    Duration::days(days.clamp(0, MAX_WINDOW_DAYS))
}

/// Trims `value` and checks its length in characters.
pub fn bounded_text(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<String, FieldError> {
    let trimmed = value.trim();
    let length = trimmed.chars().count();
    if length < min {
        return Err(if min <= 1 {
            FieldError::new(field, "this field may not be blank")
        } else {
            FieldError::new(field, format!("must be at least {min} characters"))
        });
    }
    if length > max {
        return Err(FieldError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Like [`bounded_text`] for optional fields; blank input collapses to `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, FieldError> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => bounded_text(field, value, 0, max).map(Some),
        None => Ok(None),
    }
}

pub fn optional_url(field: &'static str, value: Option<&str>) -> Result<Option<String>, FieldError> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(url) if is_valid_url(url) => Ok(Some(url.to_string())),
        Some(_) => Err(FieldError::new(field, "enter a valid URL")),
        None => Ok(None),
    }
}
