use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use super::domain::{ForumPostView, PostDraft, PostQuery};
use super::service::{ForumService, ForumServiceError};
use crate::api::{ApiError, ApiResult, AppContext, CurrentUser};
use crate::engagement::{Comment, LikeToggle};
use crate::ids::PostId;
use crate::pagination::Page;

pub fn forum_router() -> Router<AppContext> {
    Router::new()
        .route("/api/v1/forum", get(list_handler).post(create_handler))
        .route("/api/v1/forum/popular", get(popular_handler))
        .route(
            "/api/v1/forum/:post_id",
            get(detail_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
        .route(
            "/api/v1/forum/:post_id/comments",
            get(comments_handler).post(add_comment_handler),
        )
        .route("/api/v1/forum/:post_id/like", post(like_handler))
}

#[derive(Debug, Deserialize)]
pub(crate) struct PopularQuery {
    #[serde(default)]
    pub(crate) days: Option<i64>,
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentBody {
    pub(crate) text: String,
}

pub(crate) async fn list_handler(
    State(forum): State<Arc<ForumService>>,
    Query(query): Query<PostQuery>,
) -> ApiResult<Json<Page<ForumPostView>>> {
    Ok(Json(forum.list(&query)?))
}

pub(crate) async fn create_handler(
    State(forum): State<Arc<ForumService>>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<PostDraft>,
) -> ApiResult<impl IntoResponse> {
    let post = forum.create(&user, draft)?;
    Ok((StatusCode::CREATED, Json(forum.detail(post.id)?)))
}

pub(crate) async fn detail_handler(
    State(forum): State<Arc<ForumService>>,
    Path(post_id): Path<u64>,
) -> ApiResult<Json<ForumPostView>> {
    Ok(Json(forum.detail(PostId::from(post_id))?))
}

pub(crate) async fn update_handler(
    State(forum): State<Arc<ForumService>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<u64>,
    Json(draft): Json<PostDraft>,
) -> ApiResult<Json<ForumPostView>> {
    let post = forum.update(&user, PostId::from(post_id), draft)?;
    Ok(Json(forum.detail(post.id)?))
}

pub(crate) async fn delete_handler(
    State(forum): State<Arc<ForumService>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<u64>,
) -> ApiResult<StatusCode> {
    forum.delete(&user, PostId::from(post_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn comments_handler(
    State(forum): State<Arc<ForumService>>,
    Path(post_id): Path<u64>,
) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(forum.comments(PostId::from(post_id))?))
}

pub(crate) async fn add_comment_handler(
    State(forum): State<Arc<ForumService>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<u64>,
    Json(body): Json<CommentBody>,
) -> ApiResult<impl IntoResponse> {
    let comment = forum.add_comment(&user, PostId::from(post_id), &body.text)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub(crate) async fn like_handler(
    State(forum): State<Arc<ForumService>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<u64>,
) -> ApiResult<Json<LikeToggle>> {
    Ok(Json(forum.toggle_like(&user, PostId::from(post_id))?))
}

pub(crate) async fn popular_handler(
    State(forum): State<Arc<ForumService>>,
    Query(query): Query<PopularQuery>,
) -> ApiResult<Json<Vec<ForumPostView>>> {
    Ok(Json(forum.popular(
        Utc::now(),
        query.days.unwrap_or(7).max(0),
        query.limit.unwrap_or(5),
    )?))
}

impl From<ForumServiceError> for ApiError {
    fn from(value: ForumServiceError) -> Self {
        match value {
            ForumServiceError::Invalid(field) => field.into(),
            ForumServiceError::NotFound => ApiError::not_found(value.to_string()),
            ForumServiceError::Forbidden => ApiError::forbidden(value.to_string()),
            ForumServiceError::Engagement(err) => err.into(),
            ForumServiceError::Repository(err) => err.into(),
        }
    }
}
