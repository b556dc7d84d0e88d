use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use super::domain::{ContactDraft, ContactRequest};
use super::service::{ContactError, ContactService};
use crate::api::{ApiError, ApiResult, AppContext, CurrentUser};
use crate::ids::ContactId;

pub fn contact_router() -> Router<AppContext> {
    Router::new()
        .route(
            "/api/v1/info-requests",
            get(list_handler).post(submit_handler),
        )
        .route("/api/v1/info-requests/:request_id", get(detail_handler))
}

pub(crate) async fn submit_handler(
    State(contact): State<Arc<ContactService>>,
    Json(draft): Json<ContactDraft>,
) -> ApiResult<impl IntoResponse> {
    let request = contact.submit(draft)?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub(crate) async fn list_handler(
    State(contact): State<Arc<ContactService>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<ContactRequest>>> {
    Ok(Json(contact.list(&user)?))
}

pub(crate) async fn detail_handler(
    State(contact): State<Arc<ContactService>>,
    CurrentUser(user): CurrentUser,
    Path(request_id): Path<u64>,
) -> ApiResult<Json<ContactRequest>> {
    Ok(Json(contact.get(&user, ContactId::from(request_id))?))
}

impl From<ContactError> for ApiError {
    fn from(value: ContactError) -> Self {
        match value {
            ContactError::Invalid(field) => field.into(),
            ContactError::NotFound => ApiError::not_found(value.to_string()),
            ContactError::Forbidden => ApiError::forbidden(value.to_string()),
            ContactError::Repository(err) => err.into(),
        }
    }
}
