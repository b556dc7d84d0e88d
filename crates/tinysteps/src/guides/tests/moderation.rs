use crate::guides::{GuideStatus, GuideType, ModerationError, StatusFilter};
use crate::testing::TestApp;

use super::common::submission;

#[test]
fn approval_publishes_and_tells_the_author() {
    let app = TestApp::new();
    let author = app.user("nora");
    let admin = app.staff("admin");
    let guide = app
        .context
        .guides
        .submit(&author, GuideType::Nutrition, submission("Finger foods"))
        .expect("submitted");
    let moderation = &app.context.moderation;
    assert_eq!(moderation.pending_count().expect("count"), 1);

    let approved = moderation.approve(&admin, guide.id, None).expect("approved");
    assert_eq!(approved.status, GuideStatus::Approved);
    assert_eq!(approved.moderated_by, Some(admin.id));
    assert_eq!(approved.moderation_notes.as_deref(), Some("Approved by moderator"));
    assert!(approved.published_at.is_some());
    assert_eq!(moderation.pending_count().expect("count"), 0);

    let notes = app.context.notifications.list(author.id).expect("notifications");
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "Your guide was approved");

    let sent = app.mailer.sent();
    let email = sent
        .iter()
        .find(|email| email.subject == "Your guide has been approved!")
        .expect("author e-mailed");
    assert_eq!(email.to, vec!["nora@tinysteps.test".to_string()]);
    assert!(email
        .body
        .contains(&format!("/api/v1/guides/nutrition/{}", guide.id)));
}

#[test]
fn rejection_needs_a_reason_and_keeps_it() {
    let app = TestApp::new();
    let author = app.user("nora");
    let admin = app.staff("admin");
    let guide = app
        .context
        .guides
        .submit(&author, GuideType::Parent, submission("Potty training"))
        .expect("submitted");
    let moderation = &app.context.moderation;

    assert!(matches!(
        moderation.reject(&admin, guide.id, "   "),
        Err(ModerationError::Invalid(_))
    ));
    assert!(matches!(
        moderation.reject(&admin, guide.id, &"x".repeat(501)),
        Err(ModerationError::Invalid(_))
    ));

    let rejected = moderation
        .reject(&admin, guide.id, "Please cite a pediatric source")
        .expect("rejected");
    assert_eq!(rejected.status, GuideStatus::Rejected);
    assert_eq!(
        rejected.rejection_reason.as_deref(),
        Some("Please cite a pediatric source")
    );
    let notes = app.context.notifications.list(author.id).expect("notifications");
    assert!(notes[0].message.contains("Please cite a pediatric source"));
    assert!(app
        .mailer
        .sent()
        .iter()
        .any(|email| email.subject == "Feedback on your submitted guide"));
}

#[test]
fn repeated_moves_and_non_staff_are_refused() {
    let app = TestApp::new();
    let author = app.user("nora");
    let admin = app.staff("admin");
    let guide = app
        .context
        .guides
        .submit(&author, GuideType::Parent, submission("Car seat checks"))
        .expect("submitted");
    let moderation = &app.context.moderation;

    assert!(matches!(
        moderation.approve(&author, guide.id, None),
        Err(ModerationError::Forbidden)
    ));
    moderation.approve(&admin, guide.id, None).expect("approved");
    assert!(matches!(
        moderation.approve(&admin, guide.id, None),
        Err(ModerationError::InvalidTransition {
            from: GuideStatus::Approved,
            to: GuideStatus::Approved
        })
    ));

    let first_published = app
        .context
        .guides
        .visible(None, guide.id)
        .expect("visible")
        .published_at;
    moderation
        .reject(&admin, guide.id, "Outdated advice")
        .expect("unpublished");
    let again = moderation.approve(&admin, guide.id, None).expect("re-approved");
    assert_eq!(again.published_at, first_published);

    assert!(matches!(
        moderation.approve(&admin, crate::ids::GuideId(404), None),
        Err(ModerationError::NotFound)
    ));
}

#[test]
fn listings_filter_by_status_and_type() {
    let app = TestApp::new();
    let author = app.user("nora");
    let admin = app.staff("admin");
    let guides = &app.context.guides;
    let parent_guide = guides
        .submit(&author, GuideType::Parent, submission("Reading aloud"))
        .expect("parent guide");
    guides
        .submit(&author, GuideType::Nutrition, submission("Snack ideas"))
        .expect("nutrition guide");
    let moderation = &app.context.moderation;
    moderation
        .approve(&admin, parent_guide.id, None)
        .expect("approved");

    assert_eq!(moderation.by_status(StatusFilter::All, None).expect("all").len(), 2);
    let pending = moderation.pending().expect("pending");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].guide_type, GuideType::Nutrition);
    assert!(moderation
        .by_status(
            StatusFilter::Only(GuideStatus::Approved),
            Some(GuideType::Nutrition)
        )
        .expect("filtered")
        .is_empty());
}

#[test]
fn pending_count_ignores_moderated_guides() {
    let app = TestApp::new();
    let author = app.user("nora");
    let admin = app.staff("admin");
    let guides = &app.context.guides;
    let moderation = &app.context.moderation;
    let mut ids = Vec::new();
    for title in ["Bath time", "Tummy time", "Story time"] {
        ids.push(
            guides
                .submit(&author, GuideType::Parent, submission(title))
                .expect("submitted")
                .id,
        );
    }
    moderation.approve(&admin, ids[0], None).expect("approved");
    moderation
        .reject(&admin, ids[1], "Needs sources")
        .expect("rejected");

    assert_eq!(moderation.pending_count().expect("count"), 1);
    assert_eq!(
        moderation.pending_count().expect("count"),
        moderation.pending().expect("pending").len()
    );
}
