use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Deserialize;

use super::domain::{Comment, CommentDraft, ContentKind};
use super::service::{EngagementError, EngagementService};
use crate::api::{ApiError, ApiResult, AppContext, CurrentUser, MaybeUser};
use crate::guides::GuideService;
use crate::ids::{CommentId, GuideId};

pub fn engagement_router() -> Router<AppContext> {
    Router::new()
        .route(
            "/api/v1/comments",
            get(list_handler).post(create_handler),
        )
        .route("/api/v1/comments/:comment_id", delete(delete_handler))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentQuery {
    pub(crate) content_type: String,
    pub(crate) object_id: u64,
}

/// Guide targets go through `GuideService` so unpublished guides stay hidden.
pub(crate) async fn create_handler(
    State(engagement): State<Arc<EngagementService>>,
    State(guides): State<Arc<GuideService>>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<CommentDraft>,
) -> ApiResult<impl IntoResponse> {
    let target = engagement.target_from(&draft.content_type, draft.object_id)?;
    let comment = match target.kind {
        ContentKind::Guide => {
            guides.add_comment(&user, GuideId::from(target.object_id), &draft.text)?
        }
        ContentKind::ForumPost => engagement.add_comment(&user, target, &draft.text)?,
    };
    Ok((StatusCode::CREATED, Json(comment)))
}

pub(crate) async fn list_handler(
    State(engagement): State<Arc<EngagementService>>,
    State(guides): State<Arc<GuideService>>,
    MaybeUser(viewer): MaybeUser,
    Query(query): Query<CommentQuery>,
) -> ApiResult<Json<Vec<Comment>>> {
    let target = engagement.target_from(&query.content_type, query.object_id)?;
    let comments = match target.kind {
        ContentKind::Guide => {
            guides.comments(viewer.as_ref(), GuideId::from(target.object_id))?
        }
        ContentKind::ForumPost => engagement.comments(target)?,
    };
    Ok(Json(comments))
}

pub(crate) async fn delete_handler(
    State(engagement): State<Arc<EngagementService>>,
    CurrentUser(user): CurrentUser,
    Path(comment_id): Path<u64>,
) -> ApiResult<StatusCode> {
    engagement.delete_comment(&user, CommentId::from(comment_id))?;
    Ok(StatusCode::NO_CONTENT)
}

impl From<EngagementError> for ApiError {
    fn from(value: EngagementError) -> Self {
        match value {
            EngagementError::Invalid(field) => field.into(),
            EngagementError::UnsupportedContentType(_)
            | EngagementError::TargetNotFound(_)
            | EngagementError::NotLikeable => ApiError::validation(value.to_string()),
            EngagementError::CommentNotFound => ApiError::not_found(value.to_string()),
            EngagementError::Forbidden => ApiError::forbidden(value.to_string()),
            EngagementError::Repository(err) => err.into(),
        }
    }
}
