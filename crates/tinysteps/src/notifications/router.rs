use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::domain::{Notification, UnreadCount};
use super::service::{NotificationError, NotificationService};
use crate::api::{ApiError, ApiResult, AppContext, CurrentUser};
use crate::ids::NotificationId;

pub fn notification_router() -> Router<AppContext> {
    Router::new()
        .route("/api/v1/notifications", get(list_handler))
        .route("/api/v1/notifications/unread-count", get(unread_handler))
        .route("/api/v1/notifications/read-all", post(read_all_handler))
        .route(
            "/api/v1/notifications/:notification_id/read",
            post(read_handler),
        )
}

pub(crate) async fn list_handler(
    State(notifications): State<Arc<NotificationService>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(notifications.list(user.id)?))
}

pub(crate) async fn unread_handler(
    State(notifications): State<Arc<NotificationService>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<UnreadCount>> {
    Ok(Json(notifications.unread_count(user.id)?))
}

pub(crate) async fn read_handler(
    State(notifications): State<Arc<NotificationService>>,
    CurrentUser(user): CurrentUser,
    Path(notification_id): Path<u64>,
) -> ApiResult<Json<Notification>> {
    Ok(Json(notifications.mark_read(
        user.id,
        NotificationId::from(notification_id),
    )?))
}

pub(crate) async fn read_all_handler(
    State(notifications): State<Arc<NotificationService>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Value>> {
    let updated = notifications.mark_all_read(user.id)?;
    Ok(Json(json!({ "status": "ok", "updated": updated })))
}

impl From<NotificationError> for ApiError {
    fn from(value: NotificationError) -> Self {
        match value {
            NotificationError::NotFound => ApiError::not_found(value.to_string()),
            NotificationError::Repository(err) => err.into(),
        }
    }
}
