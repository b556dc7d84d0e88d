use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::domain::{Credentials, ProfileUpdate, ProfileView, Registration, UserView};
use super::service::{AccountError, AccountService};
use crate::api::{ApiError, ApiResult, AppContext, BearerToken, CurrentUser};
use crate::ids::UserId;

pub fn account_router() -> Router<AppContext> {
    Router::new()
        .route("/api/v1/auth/register", post(register_handler))
        .route("/api/v1/auth/login", post(login_handler))
        .route("/api/v1/auth/logout", post(logout_handler))
        .route("/api/v1/auth/password-reset", post(reset_request_handler))
        .route(
            "/api/v1/auth/password-reset/confirm",
            post(reset_confirm_handler),
        )
        .route("/api/v1/users", get(list_users_handler))
        .route("/api/v1/users/me", get(me_handler).patch(update_me_handler))
        .route("/api/v1/users/:user_id", get(profile_handler))
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginResponse {
    pub(crate) token: String,
    pub(crate) expires_at: DateTime<Utc>,
    pub(crate) user: UserView,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResetRequest {
    pub(crate) email: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResetConfirmation {
    pub(crate) token: Uuid,
    pub(crate) password: String,
}

pub(crate) async fn register_handler(
    State(accounts): State<Arc<AccountService>>,
    Json(registration): Json<Registration>,
) -> ApiResult<impl IntoResponse> {
    let user = accounts.register(registration)?;
    Ok((StatusCode::CREATED, Json(user.profile_view())))
}

pub(crate) async fn login_handler(
    State(accounts): State<Arc<AccountService>>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<Json<LoginResponse>> {
    let session = accounts.login(credentials)?;
    let user = accounts.get(session.user_id)?;
    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: user.view(),
    }))
}

pub(crate) async fn logout_handler(
    State(accounts): State<Arc<AccountService>>,
    BearerToken(token): BearerToken,
) -> ApiResult<StatusCode> {
    accounts.logout(&token)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn reset_request_handler(
    State(accounts): State<Arc<AccountService>>,
    Json(request): Json<ResetRequest>,
) -> ApiResult<impl IntoResponse> {
    accounts.request_password_reset(&request.email)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "status": "ok",
            "message": "if the address is registered, a reset link is on its way",
        })),
    ))
}

pub(crate) async fn reset_confirm_handler(
    State(accounts): State<Arc<AccountService>>,
    Json(confirmation): Json<ResetConfirmation>,
) -> ApiResult<Json<serde_json::Value>> {
    accounts.confirm_password_reset(&confirmation.token, &confirmation.password)?;
    Ok(Json(json!({ "status": "ok" })))
}

pub(crate) async fn me_handler(CurrentUser(user): CurrentUser) -> Json<ProfileView> {
    Json(user.profile_view())
}

pub(crate) async fn update_me_handler(
    State(accounts): State<Arc<AccountService>>,
    CurrentUser(user): CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<ProfileView>> {
    let user = accounts.update_profile(user.id, update)?;
    Ok(Json(user.profile_view()))
}

pub(crate) async fn list_users_handler(
    State(accounts): State<Arc<AccountService>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<UserView>>> {
    let users = accounts.list_users(&user)?;
    Ok(Json(users.iter().map(|user| user.view()).collect()))
}

pub(crate) async fn profile_handler(
    State(accounts): State<Arc<AccountService>>,
    Path(user_id): Path<u64>,
) -> ApiResult<Json<ProfileView>> {
    let user = accounts.get(UserId::from(user_id))?;
    Ok(Json(user.profile_view()))
}

impl From<AccountError> for ApiError {
    fn from(value: AccountError) -> Self {
        match value {
            AccountError::Invalid(field) => field.into(),
            AccountError::UsernameTaken | AccountError::EmailTaken => {
                ApiError::conflict(value.to_string())
            }
            AccountError::InvalidCredentials | AccountError::Unauthenticated => {
                ApiError::unauthenticated(value.to_string())
            }
            AccountError::Forbidden => ApiError::forbidden(value.to_string()),
            AccountError::NotFound => ApiError::not_found(value.to_string()),
            AccountError::InvalidResetToken => ApiError::validation(value.to_string()),
            AccountError::Repository(err) => err.into(),
        }
    }
}
