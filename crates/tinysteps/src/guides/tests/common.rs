use crate::guides::GuideSubmission;

/// Guide bodies need at least 300 characters.
pub(super) fn body(topic: &str) -> String {
    format!("{topic}. ").repeat(320 / (topic.len() + 2) + 1)
}

pub(super) fn submission(title: &str) -> GuideSubmission {
    GuideSubmission {
        title: title.to_string(),
        desc: body(title),
        summary: Some(format!("A short guide about {}", title.to_lowercase())),
        tags: Some("Sleep, routine".to_string()),
        ..GuideSubmission::default()
    }
}
