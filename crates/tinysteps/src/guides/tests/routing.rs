use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::testing::{send, TestApp};

use super::common::body;

#[tokio::test]
async fn submit_moderate_and_read_over_http() {
    let app = TestApp::new();
    let router = app.router();
    let author = app.user("nora");
    let author_token = app.token(&author);
    let admin = app.staff("admin");
    let admin_token = app.token(&admin);

    let (status, created) = send(
        &router,
        Method::POST,
        "/api/v1/guides/parent",
        Some(&author_token),
        Some(json!({
            "title": "Calming a fussy baby",
            "desc": body("Calming a fussy baby"),
            "tags": "Crying, Sleep"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["type_label"], "Parent Guide");
    let id = created["id"].as_u64().expect("guide id");
    let detail = format!("/api/v1/guides/parent/{id}");

    let (status, _) = send(&router, Method::GET, &detail, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&router, Method::GET, &detail, Some(&author_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &router,
        Method::GET,
        "/api/v1/moderation/pending/count",
        Some(&author_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, count) = send(
        &router,
        Method::GET,
        "/api/v1/moderation/pending/count",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(count, json!({"pending": 1}));

    let approve = format!("/api/v1/moderation/guides/{id}/approve");
    let (status, approved) = send(
        &router,
        Method::POST,
        &approve,
        Some(&admin_token),
        Some(json!({"notes": "Lovely"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["moderation_notes"], "Lovely");

    let (status, body) = send(&router, Method::POST, &approve, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["type"], "conflict");

    let (status, listed) = send(&router, Method::GET, "/api/v1/guides/parent", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    let (_, other_shelf) = send(&router, Method::GET, "/api/v1/guides/nutrition", None, None).await;
    assert_eq!(other_shelf, json!([]));
    let (status, _) = send(
        &router,
        Method::GET,
        &format!("/api/v1/guides/nutrition/{id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, comment) = send(
        &router,
        Method::POST,
        &format!("{detail}/comments"),
        Some(&admin_token),
        Some(json!({"text": "Helpful, thank you"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["author_name"], "admin");
    let (_, viewed) = send(&router, Method::GET, &detail, None, None).await;
    assert_eq!(viewed["comments_count"], 1);
}

#[tokio::test]
async fn moderation_listing_validates_status() {
    let app = TestApp::new();
    let router = app.router();
    let admin = app.staff("admin");
    let token = app.token(&admin);

    let (status, body) = send(
        &router,
        Method::GET,
        "/api/v1/moderation/guides?status=archived",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "validation_error");

    let (status, body) = send(
        &router,
        Method::GET,
        "/api/v1/moderation/guides?status=all&guide_type=nutrition",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, category) = send(
        &router,
        Method::POST,
        "/api/v1/categories",
        Some(&token),
        Some(json!({"name": "Feeding"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category["name"], "Feeding");
    let (_, tree) = send(&router, Method::GET, "/api/v1/categories/tree", None, None).await;
    assert_eq!(tree[0]["full_name"], "Feeding");
}
