use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::contact::{ContactDraft, ContactError};
use crate::ids::ContactId;
use crate::testing::{send, TestApp};

fn draft(name: &str, message: &str) -> ContactDraft {
    ContactDraft {
        name: name.to_string(),
        email: "visitor@tinysteps.test".to_string(),
        phone: Some("+44 20 7946 0000".to_string()),
        message: message.to_string(),
    }
}

#[test]
fn submissions_are_stored_and_confirmed() {
    let app = TestApp::new();
    let contact = &app.context.contact;

    let request = contact
        .submit(draft("Rosa", "Do you run local meetups?"))
        .expect("submitted");
    assert_eq!(request.name, "Rosa");

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["visitor@tinysteps.test".to_string()]);
    assert!(sent[0].body.contains("Do you run local meetups?"));
}

#[test]
fn submissions_are_validated() {
    let app = TestApp::new();
    let contact = &app.context.contact;

    let bad_email = ContactDraft {
        email: "rosa-at-home".to_string(),
        ..draft("Rosa", "Hello")
    };
    match contact.submit(bad_email) {
        Err(ContactError::Invalid(field)) => assert_eq!(field.field, "email"),
        other => panic!("expected email error, got {other:?}"),
    }
    let long_phone = ContactDraft {
        phone: Some("0".repeat(21)),
        ..draft("Rosa", "Hello")
    };
    match contact.submit(long_phone) {
        Err(ContactError::Invalid(field)) => assert_eq!(field.field, "phone"),
        other => panic!("expected phone error, got {other:?}"),
    }
    match contact.submit(draft("Rosa", &"a".repeat(5001))) {
        Err(ContactError::Invalid(field)) => assert_eq!(field.field, "message"),
        other => panic!("expected message error, got {other:?}"),
    }
    assert!(app.mailer.sent().is_empty());
}

#[test]
fn only_staff_read_requests() {
    let app = TestApp::new();
    let parent = app.user("rosa");
    let admin = app.staff("admin");
    let contact = &app.context.contact;
    contact.submit(draft("Rosa", "First")).expect("first");
    let second = contact.submit(draft("Rosa", "Second")).expect("second");

    assert!(matches!(contact.list(&parent), Err(ContactError::Forbidden)));
    let listed = contact.list(&admin).expect("list");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert!(matches!(
        contact.get(&admin, ContactId(99)),
        Err(ContactError::NotFound)
    ));
}

#[tokio::test]
async fn public_form_and_staff_inbox_over_http() {
    let app = TestApp::new();
    let router = app.router();
    let admin = app.staff("admin");

    let (status, created) = send(
        &router,
        Method::POST,
        "/api/v1/info-requests",
        None,
        Some(json!({"name": "Rosa", "email": "rosa@tinysteps.test", "message": "Hi there"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_u64().expect("id");

    let (status, _) = send(&router, Method::GET, "/api/v1/info-requests", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, detail) = send(
        &router,
        Method::GET,
        &format!("/api/v1/info-requests/{id}"),
        Some(&app.token(&admin)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["message"], "Hi there");
}
