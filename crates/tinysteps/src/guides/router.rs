use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use super::category::{Category, CategoryCount, CategoryDraft, CategoryNode};
use super::domain::{Guide, GuideSubmission, GuideType, GuideView, StatusFilter};
use super::moderation::{ModerationError, ModerationService};
use super::service::{GuideServiceError, GuideService, DEFAULT_LATEST};
use crate::api::{ApiError, ApiResult, AppContext, CurrentUser, MaybeUser};
use crate::engagement::Comment;
use crate::external::ExternalArticle;
use crate::ids::GuideId;

pub fn guide_router() -> Router<AppContext> {
    Router::new()
        .route("/api/v1/guides/mine", get(mine_handler))
        .route(
            "/api/v1/guides/:guide_type",
            get(list_handler).post(submit_handler),
        )
        .route("/api/v1/guides/:guide_type/latest", get(latest_handler))
        .route("/api/v1/guides/:guide_type/search", get(search_handler))
        .route(
            "/api/v1/guides/:guide_type/categories",
            get(shelf_categories_handler),
        )
        .route("/api/v1/guides/:guide_type/articles", get(articles_handler))
        .route(
            "/api/v1/guides/:guide_type/:guide_id",
            get(detail_handler)
                .put(revise_handler)
                .delete(delete_handler),
        )
        .route(
            "/api/v1/guides/:guide_type/:guide_id/related",
            get(related_handler),
        )
        .route(
            "/api/v1/guides/:guide_type/:guide_id/comments",
            get(comments_handler).post(add_comment_handler),
        )
        .route("/api/v1/guides/:guide_type/:guide_id/tags", put(tags_handler))
        .route(
            "/api/v1/categories",
            get(categories_handler).post(create_category_handler),
        )
        .route("/api/v1/categories/tree", get(category_tree_handler))
        .route("/api/v1/moderation/guides", get(moderation_list_handler))
        .route("/api/v1/moderation/pending", get(pending_handler))
        .route("/api/v1/moderation/pending/count", get(pending_count_handler))
        .route(
            "/api/v1/moderation/guides/:guide_id/approve",
            post(approve_handler),
        )
        .route(
            "/api/v1/moderation/guides/:guide_id/reject",
            post(reject_handler),
        )
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    #[serde(default)]
    pub(crate) count: Option<usize>,
    #[serde(default)]
    pub(crate) q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ModerationQuery {
    #[serde(default)]
    pub(crate) status: Option<String>,
    #[serde(default)]
    pub(crate) guide_type: Option<GuideType>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagsBody {
    pub(crate) tags: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentBody {
    pub(crate) text: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApproveBody {
    #[serde(default)]
    pub(crate) notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RejectBody {
    pub(crate) reason: String,
}

fn views(guides: &GuideService, list: Vec<Guide>) -> ApiResult<Json<Vec<GuideView>>> {
    let views = list
        .into_iter()
        .map(|guide| guides.view(guide))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(views))
}

fn require_staff(user: &crate::accounts::User) -> ApiResult<()> {
    if user.is_staff {
        Ok(())
    } else {
        Err(ApiError::forbidden("staff access required"))
    }
}

pub(crate) async fn list_handler(
    State(guides): State<Arc<GuideService>>,
    Path(guide_type): Path<GuideType>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<GuideView>>> {
    let list = guides.shelf(guide_type).approved(query.limit, None)?;
    views(&guides, list)
}

pub(crate) async fn submit_handler(
    State(guides): State<Arc<GuideService>>,
    CurrentUser(user): CurrentUser,
    Path(guide_type): Path<GuideType>,
    Json(submission): Json<GuideSubmission>,
) -> ApiResult<impl IntoResponse> {
    let guide = guides.submit(&user, guide_type, submission)?;
    Ok((StatusCode::CREATED, Json(guides.view(guide)?)))
}

pub(crate) async fn latest_handler(
    State(guides): State<Arc<GuideService>>,
    Path(guide_type): Path<GuideType>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<GuideView>>> {
    let list = guides
        .shelf(guide_type)
        .latest(query.count.unwrap_or(DEFAULT_LATEST))?;
    views(&guides, list)
}

pub(crate) async fn search_handler(
    State(guides): State<Arc<GuideService>>,
    Path(guide_type): Path<GuideType>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<GuideView>>> {
    let term = query.q.unwrap_or_default();
    let list = guides.shelf(guide_type).search(&term, query.limit)?;
    views(&guides, list)
}

pub(crate) async fn shelf_categories_handler(
    State(guides): State<Arc<GuideService>>,
    Path(guide_type): Path<GuideType>,
) -> ApiResult<Json<Vec<CategoryCount>>> {
    Ok(Json(guides.shelf(guide_type).categories()?))
}

pub(crate) async fn articles_handler(
    State(guides): State<Arc<GuideService>>,
    Path(guide_type): Path<GuideType>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<ExternalArticle>>> {
    Ok(Json(guides.shelf(guide_type).articles(query.limit)?))
}

pub(crate) async fn detail_handler(
    State(guides): State<Arc<GuideService>>,
    MaybeUser(viewer): MaybeUser,
    Path((guide_type, guide_id)): Path<(GuideType, u64)>,
) -> ApiResult<Json<GuideView>> {
    let guide = guides
        .shelf(guide_type)
        .detail(viewer.as_ref(), GuideId::from(guide_id))?;
    Ok(Json(guides.view(guide)?))
}

pub(crate) async fn revise_handler(
    State(guides): State<Arc<GuideService>>,
    CurrentUser(user): CurrentUser,
    Path((guide_type, guide_id)): Path<(GuideType, u64)>,
    Json(submission): Json<GuideSubmission>,
) -> ApiResult<Json<GuideView>> {
    let id = GuideId::from(guide_id);
    guides.shelf(guide_type).detail(Some(&user), id)?;
    let guide = guides.revise(&user, id, submission)?;
    Ok(Json(guides.view(guide)?))
}

pub(crate) async fn delete_handler(
    State(guides): State<Arc<GuideService>>,
    CurrentUser(user): CurrentUser,
    Path((guide_type, guide_id)): Path<(GuideType, u64)>,
) -> ApiResult<StatusCode> {
    let id = GuideId::from(guide_id);
    guides.shelf(guide_type).detail(Some(&user), id)?;
    guides.delete(&user, id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn related_handler(
    State(guides): State<Arc<GuideService>>,
    MaybeUser(viewer): MaybeUser,
    Path((guide_type, guide_id)): Path<(GuideType, u64)>,
) -> ApiResult<Json<Vec<GuideView>>> {
    let shelf = guides.shelf(guide_type);
    let id = GuideId::from(guide_id);
    shelf.detail(viewer.as_ref(), id)?;
    let list = shelf.related(id)?;
    views(&guides, list)
}

pub(crate) async fn comments_handler(
    State(guides): State<Arc<GuideService>>,
    MaybeUser(viewer): MaybeUser,
    Path((guide_type, guide_id)): Path<(GuideType, u64)>,
) -> ApiResult<Json<Vec<Comment>>> {
    let id = GuideId::from(guide_id);
    guides.shelf(guide_type).detail(viewer.as_ref(), id)?;
    Ok(Json(guides.comments(viewer.as_ref(), id)?))
}

pub(crate) async fn add_comment_handler(
    State(guides): State<Arc<GuideService>>,
    CurrentUser(user): CurrentUser,
    Path((guide_type, guide_id)): Path<(GuideType, u64)>,
    Json(body): Json<CommentBody>,
) -> ApiResult<impl IntoResponse> {
    let id = GuideId::from(guide_id);
    guides.shelf(guide_type).detail(Some(&user), id)?;
    let comment = guides.add_comment(&user, id, &body.text)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub(crate) async fn tags_handler(
    State(guides): State<Arc<GuideService>>,
    CurrentUser(user): CurrentUser,
    Path((guide_type, guide_id)): Path<(GuideType, u64)>,
    Json(body): Json<TagsBody>,
) -> ApiResult<Json<GuideView>> {
    let id = GuideId::from(guide_id);
    guides.shelf(guide_type).detail(Some(&user), id)?;
    let guide = guides.set_tags(&user, id, &body.tags)?;
    Ok(Json(guides.view(guide)?))
}

pub(crate) async fn mine_handler(
    State(guides): State<Arc<GuideService>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<GuideView>>> {
    let list = guides.by_author(user.id)?;
    views(&guides, list)
}

pub(crate) async fn categories_handler(
    State(guides): State<Arc<GuideService>>,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(guides.categories()?))
}

pub(crate) async fn category_tree_handler(
    State(guides): State<Arc<GuideService>>,
) -> ApiResult<Json<Vec<CategoryNode>>> {
    Ok(Json(guides.category_tree()?))
}

pub(crate) async fn create_category_handler(
    State(guides): State<Arc<GuideService>>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<CategoryDraft>,
) -> ApiResult<impl IntoResponse> {
    let category = guides.create_category(&user, draft)?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub(crate) async fn moderation_list_handler(
    State(moderation): State<Arc<ModerationService>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ModerationQuery>,
) -> ApiResult<Json<Vec<Guide>>> {
    require_staff(&user)?;
    let status = StatusFilter::parse(query.status.as_deref())
        .ok_or_else(|| ApiError::validation("status must be pending, approved, rejected or all"))?;
    Ok(Json(moderation.by_status(status, query.guide_type)?))
}

pub(crate) async fn pending_handler(
    State(moderation): State<Arc<ModerationService>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<Guide>>> {
    require_staff(&user)?;
    Ok(Json(moderation.pending()?))
}

pub(crate) async fn pending_count_handler(
    State(moderation): State<Arc<ModerationService>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Value>> {
    require_staff(&user)?;
    Ok(Json(json!({ "pending": moderation.pending_count()? })))
}

pub(crate) async fn approve_handler(
    State(moderation): State<Arc<ModerationService>>,
    CurrentUser(user): CurrentUser,
    Path(guide_id): Path<u64>,
    body: Option<Json<ApproveBody>>,
) -> ApiResult<Json<Guide>> {
    let notes = body.and_then(|Json(body)| body.notes);
    Ok(Json(moderation.approve(
        &user,
        GuideId::from(guide_id),
        notes.as_deref(),
    )?))
}

pub(crate) async fn reject_handler(
    State(moderation): State<Arc<ModerationService>>,
    CurrentUser(user): CurrentUser,
    Path(guide_id): Path<u64>,
    Json(body): Json<RejectBody>,
) -> ApiResult<Json<Guide>> {
    Ok(Json(moderation.reject(
        &user,
        GuideId::from(guide_id),
        &body.reason,
    )?))
}

impl From<GuideServiceError> for ApiError {
    fn from(value: GuideServiceError) -> Self {
        match value {
            GuideServiceError::Invalid(field) => field.into(),
            GuideServiceError::NotFound | GuideServiceError::CategoryNotFound => {
                ApiError::not_found(value.to_string())
            }
            GuideServiceError::Forbidden => ApiError::forbidden(value.to_string()),
            GuideServiceError::Engagement(err) => err.into(),
            GuideServiceError::Repository(err) => err.into(),
        }
    }
}

impl From<ModerationError> for ApiError {
    fn from(value: ModerationError) -> Self {
        match value {
            ModerationError::Invalid(field) => field.into(),
            ModerationError::Forbidden => ApiError::forbidden(value.to_string()),
            ModerationError::NotFound => ApiError::not_found(value.to_string()),
            ModerationError::InvalidTransition { .. } => ApiError::conflict(value.to_string()),
            ModerationError::Notification(err) => err.into(),
            ModerationError::Repository(err) => err.into(),
        }
    }
}
