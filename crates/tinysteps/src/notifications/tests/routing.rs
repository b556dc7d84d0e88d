use axum::http::{Method, StatusCode};

use crate::testing::{send, TestApp};

#[tokio::test]
async fn inbox_endpoints_track_unread_state() {
    let app = TestApp::new();
    let ana = app.user("ana");
    let token = app.token(&ana);
    let router = app.router();
    let note = app
        .context
        .notifications
        .notify(ana.id, "Your guide was approved", "Thanks for contributing")
        .expect("notify");
    app.context
        .notifications
        .notify(ana.id, "Reminder: Checkup", "Tomorrow")
        .expect("notify");

    let (status, count) = send(
        &router,
        Method::GET,
        "/api/v1/notifications/unread-count",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count["unread"], 2);

    let (status, read) = send(
        &router,
        Method::POST,
        &format!("/api/v1/notifications/{}/read", note.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["read"], true);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/notifications/read-all",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);

    let bruno = app.user("bruno");
    let bruno_token = app.token(&bruno);
    let (status, _) = send(
        &router,
        Method::POST,
        &format!("/api/v1/notifications/{}/read", note.id),
        Some(&bruno_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
