use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::testing::{send, TestApp, PASSWORD};

#[tokio::test]
async fn register_login_and_logout() {
    let app = TestApp::new();
    let router = app.router();

    let (status, created) = send(
        &router,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "username": "lena",
            "email": "lena@tinysteps.test",
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["user"]["username"], "lena");
    assert!(created["user"].get("password_hash").is_none());

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "username": "lena",
            "email": "lena2@tinysteps.test",
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");

    let (status, login) = send(
        &router,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({"username": "lena", "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = login["token"].as_str().expect("token").to_string();

    let (status, me) = send(&router, Method::GET, "/api/v1/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["email"], "lena@tinysteps.test");

    let (status, _) = send(&router, Method::POST, "/api/v1/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&router, Method::GET, "/api/v1/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["type"], "authentication_error");
}

#[tokio::test]
async fn bad_credentials_and_staff_listing() {
    let app = TestApp::new();
    let router = app.router();
    let user = app.user("lena");

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({"username": "lena", "password": "nope-nope-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &router,
        Method::GET,
        "/api/v1/users",
        Some(&app.token(&user)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.staff("admin");
    let (status, users) = send(
        &router,
        Method::GET,
        "/api/v1/users",
        Some(&app.token(&admin)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().map(Vec::len), Some(2));

    let (status, _) = send(&router, Method::GET, "/api/v1/users/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/auth/password-reset",
        None,
        Some(json!({"email": "ghost@tinysteps.test"})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "ok");
}
