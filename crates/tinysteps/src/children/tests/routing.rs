use axum::http::{Method, StatusCode};
use chrono::{Duration, Local};
use serde_json::json;

use super::common::{child_draft, event_draft, vaccine_draft};
use crate::testing::{send, TestApp};

#[tokio::test]
async fn child_crud_requires_a_bearer_token() {
    let app = TestApp::new();
    let router = app.router();

    let (status, body) = send(&router, Method::GET, "/api/v1/children", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["type"], "authentication_error");

    let (status, _) = send(
        &router,
        Method::GET,
        "/api/v1/children",
        Some("not-a-session"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_child_then_fetch_with_age_fields() {
    let app = TestApp::new();
    let parent = app.user("ana");
    let token = app.token(&parent);
    let router = app.router();

    let (status, created) = send(
        &router,
        Method::POST,
        "/api/v1/children",
        Some(&token),
        Some(json!({
            "name": "Lucia",
            "birth_date": "2024-03-10",
            "gender": "F",
            "weight": 7.5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Lucia");
    assert_eq!(created["image"], "/static/res/img/others/default_child.jpg");
    assert!(created["age_months"].is_number());

    let uri = format!("/api/v1/children/{}", created["id"]);
    let (status, fetched) = send(&router, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], created["id"]);

    let stranger = app.user("bruno");
    let stranger_token = app.token(&stranger);
    let (status, body) = send(&router, Method::GET, &uri, Some(&stranger_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");

    let (status, _) = send(&router, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn invalid_child_payload_reports_field_details() {
    let app = TestApp::new();
    let parent = app.user("ana");
    let token = app.token(&parent);
    let router = app.router();

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/children",
        Some(&token),
        Some(json!({
            "name": "   ",
            "birth_date": "2024-03-10",
            "gender": "M"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "validation_error");
    assert!(body["details"]["name"].is_array());
}

#[tokio::test]
async fn events_move_and_administer_through_the_api() {
    let app = TestApp::new();
    let parent = app.user("ana");
    let token = app.token(&parent);
    let router = app.router();

    let (_, child) = send(
        &router,
        Method::POST,
        "/api/v1/children",
        Some(&token),
        Some(json!({ "name": "Lucia", "birth_date": "2024-03-10", "gender": "F" })),
    )
    .await;
    let child_id = child["id"].as_u64().expect("child id");

    let (status, event) = send(
        &router,
        Method::POST,
        &format!("/api/v1/children/{child_id}/events"),
        Some(&token),
        Some(json!({
            "title": "Pediatrician",
            "type": "doctor",
            "date": "2025-06-03",
            "time": "10:15:00",
            "has_reminder": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event["color"], "#2196f3");

    let (status, moved) = send(
        &router,
        Method::POST,
        &format!("/api/v1/events/{}/move", event["id"]),
        Some(&token),
        Some(json!({ "date": "2025-06-05", "allDay": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["date"], "2025-06-05");
    assert!(moved["time"].is_null());

    let (status, vaccine) = send(
        &router,
        Method::POST,
        &format!("/api/v1/children/{child_id}/vaccines"),
        Some(&token),
        Some(json!({ "name": "MMR", "date": "2025-05-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let stranger = app.user("bruno");
    let stranger_token = app.token(&stranger);
    let administer = format!("/api/v1/vaccines/{}/administer", vaccine["id"]);
    let (status, _) = send(&router, Method::POST, &administer, Some(&stranger_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, administered) = send(&router, Method::POST, &administer, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(administered["administered"], true);

    let (_, card) = send(
        &router,
        Method::GET,
        &format!("/api/v1/children/{child_id}/vaccines"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(card["vaccines"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn oversized_day_windows_are_clamped() {
    let app = TestApp::new();
    let parent = app.user("ana");
    let token = app.token(&parent);
    let router = app.router();
    let today = Local::now().date_naive();
    let children = &app.context.children;
    let child = children
        .create(parent.id, child_draft("Lucia"), today)
        .expect("child");
    children
        .add_vaccine(
            parent.id,
            child.id,
            vaccine_draft("MMR", today, Some(today + Duration::days(400))),
        )
        .expect("vaccine");
    children
        .add_event(
            parent.id,
            child.id,
            event_draft("Yearly check-up", today + Duration::days(400), true),
        )
        .expect("event");

    for path in ["vaccines/upcoming", "events/reminders"] {
        let uri = format!(
            "/api/v1/children/{}/{path}?days={}",
            child.id,
            i64::MAX
        );
        let (status, body) = send(&router, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(body.as_array().map(Vec::len), Some(1), "{path}");

        let uri = format!("/api/v1/children/{}/{path}?days=30", child.id);
        let (_, body) = send(&router, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(body, json!([]), "{path}");
    }
}
