use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::engagement::{ContentRef, EngagementError};
use crate::forum::{ForumCategory, PostDraft};
use crate::guides::{GuideSubmission, GuideType};
use crate::ids::{GuideId, PostId};
use crate::testing::{send, TestApp};

fn post_draft() -> PostDraft {
    PostDraft {
        title: "Baby-led weaning".to_string(),
        desc: "Did anyone skip purees entirely?".to_string(),
        category: ForumCategory::Feeding,
    }
}

#[test]
fn generic_comments_resolve_their_target() {
    let app = TestApp::new();
    let user = app.user("ivy");
    let post = app.context.forum.create(&user, post_draft()).expect("post");
    let engagement = &app.context.engagement;

    let target = engagement
        .target_from("forum_post", post.id.get())
        .expect("target");
    let comment = engagement
        .add_comment(&user, target, "We did, it went fine")
        .expect("comment");
    assert_eq!(comment.target, ContentRef::forum_post(post.id));
    assert_eq!(
        engagement.target_from("nutrition_guide", 3).expect("alias"),
        ContentRef::guide(GuideId(3))
    );

    assert!(matches!(
        engagement.target_from("recipe", 1),
        Err(EngagementError::UnsupportedContentType(_))
    ));
    assert!(matches!(
        engagement.add_comment(&user, ContentRef::forum_post(PostId(999)), "hello"),
        Err(EngagementError::TargetNotFound(_))
    ));
    assert!(matches!(
        engagement.add_comment(&user, ContentRef::forum_post(post.id), "   "),
        Err(EngagementError::Invalid(_))
    ));
}

#[test]
fn guides_take_comments_but_not_likes() {
    let app = TestApp::new();
    let user = app.user("ivy");
    let guide = app
        .context
        .guides
        .submit(
            &user,
            GuideType::Nutrition,
            GuideSubmission {
                title: "Allergen introduction".to_string(),
                desc: "Introduce one allergen at a time. ".repeat(12),
                ..GuideSubmission::default()
            },
        )
        .expect("guide");
    let engagement = &app.context.engagement;
    let target = ContentRef::guide(guide.id);

    engagement.add_comment(&user, target, "Useful list").expect("comment");
    assert_eq!(engagement.counts(target).expect("counts").comments_count, 1);
    assert!(matches!(
        engagement.toggle_like(&user, target),
        Err(EngagementError::NotLikeable)
    ));
    assert!(matches!(
        engagement.add_comment(&user, ContentRef::guide(GuideId(404)), "hello"),
        Err(EngagementError::TargetNotFound(_))
    ));
}

#[test]
fn comment_removal_is_limited_to_author_and_staff() {
    let app = TestApp::new();
    let author = app.user("ivy");
    let other = app.user("jon");
    let admin = app.staff("admin");
    let post = app.context.forum.create(&author, post_draft()).expect("post");
    let engagement = &app.context.engagement;
    let target = ContentRef::forum_post(post.id);

    let first = engagement.add_comment(&author, target, "First").expect("comment");
    let second = engagement.add_comment(&author, target, "Second").expect("comment");

    assert!(matches!(
        engagement.delete_comment(&other, first.id),
        Err(EngagementError::Forbidden)
    ));
    engagement.delete_comment(&author, first.id).expect("own comment");
    engagement.delete_comment(&admin, second.id).expect("staff");
    assert!(matches!(
        engagement.delete_comment(&admin, second.id),
        Err(EngagementError::CommentNotFound)
    ));
    assert!(engagement.comments(target).expect("comments").is_empty());
}

#[tokio::test]
async fn comment_endpoint_validates_content_type() {
    let app = TestApp::new();
    let router = app.router();
    let user = app.user("ivy");
    let post = app.context.forum.create(&user, post_draft()).expect("post");
    let token = app.token(&user);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/comments",
        Some(&token),
        Some(json!({"content_type": "video", "object_id": 1, "text": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "validation_error");

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/v1/comments",
        Some(&token),
        Some(json!({"content_type": "forum_post", "object_id": post.id.get(), "text": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/v1/comments?content_type=forum_post&object_id={}", post.id);
    let (status, comments) = send(&router, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comments[0]["text"], "hi");
}

#[tokio::test]
async fn comment_endpoint_hides_unpublished_guides() {
    let app = TestApp::new();
    let router = app.router();
    let author = app.user("nora");
    let stranger = app.user("eve");
    let guide = app
        .context
        .guides
        .submit(
            &author,
            GuideType::Parent,
            GuideSubmission {
                title: "Settling after daycare".to_string(),
                desc: "Keep the evening calm and predictable. ".repeat(10),
                ..GuideSubmission::default()
            },
        )
        .expect("guide");
    let list_uri = format!("/api/v1/comments?content_type=guide&object_id={}", guide.id);

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/v1/comments",
        Some(&app.token(&stranger)),
        Some(json!({"content_type": "guide", "object_id": guide.id.get(), "text": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/v1/comments",
        Some(&app.token(&author)),
        Some(json!({"content_type": "parent_guide", "object_id": guide.id.get(), "text": "Draft note"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&router, Method::GET, &list_uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&router, Method::GET, &list_uri, Some(&app.token(&stranger)), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, comments) =
        send(&router, Method::GET, &list_uri, Some(&app.token(&author)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comments[0]["text"], "Draft note");

    let admin = app.staff("admin");
    app.context
        .moderation
        .approve(&admin, guide.id, None)
        .expect("approve");
    let (status, comments) = send(&router, Method::GET, &list_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comments.as_array().map(Vec::len), Some(1));
}
