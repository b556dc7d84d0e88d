use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Local;
use serde::Deserialize;

use super::domain::{
    CalendarEventDraft, CalendarEventPatch, CalendarEventView, ChildDraft, ChildView, EventMove,
    EventRange, EventStatistics, Milestone, MilestoneDraft, Vaccine, VaccineCardView, VaccineDraft,
    VaccineStatistics,
};
use super::service::{ChildService, ChildServiceError};
use crate::api::{ApiError, ApiResult, AppContext, CurrentUser};
use crate::ids::{ChildId, EventId, MilestoneId, VaccineId};

const DEFAULT_UPCOMING_DAYS: i64 = 30;
const DEFAULT_UPCOMING_LIMIT: usize = 5;

pub fn child_router() -> Router<AppContext> {
    Router::new()
        .route("/api/v1/children", get(list_handler).post(create_handler))
        .route(
            "/api/v1/children/:child_id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .route(
            "/api/v1/children/:child_id/milestones",
            get(milestones_handler).post(add_milestone_handler),
        )
        .route(
            "/api/v1/children/:child_id/milestones/:milestone_id",
            delete(delete_milestone_handler),
        )
        .route(
            "/api/v1/children/:child_id/vaccines",
            get(vaccine_card_handler).post(add_vaccine_handler),
        )
        .route(
            "/api/v1/children/:child_id/vaccines/statistics",
            get(vaccine_statistics_handler),
        )
        .route(
            "/api/v1/children/:child_id/vaccines/upcoming",
            get(upcoming_vaccines_handler),
        )
        .route(
            "/api/v1/children/:child_id/vaccines/:vaccine_id",
            delete(delete_vaccine_handler),
        )
        .route(
            "/api/v1/vaccines/:vaccine_id/administer",
            post(administer_handler),
        )
        .route(
            "/api/v1/children/:child_id/events",
            get(events_handler).post(add_event_handler),
        )
        .route(
            "/api/v1/children/:child_id/events/statistics",
            get(event_statistics_handler),
        )
        .route(
            "/api/v1/children/:child_id/events/upcoming",
            get(upcoming_events_handler),
        )
        .route(
            "/api/v1/children/:child_id/events/reminders",
            get(reminders_handler),
        )
        .route(
            "/api/v1/events/:event_id",
            get(get_event_handler)
                .patch(update_event_handler)
                .delete(delete_event_handler),
        )
        .route("/api/v1/events/:event_id/move", post(move_event_handler))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpcomingQuery {
    pub(crate) days: Option<i64>,
    pub(crate) limit: Option<usize>,
}

impl UpcomingQuery {
    fn days(&self) -> i64 {
        self.days.filter(|days| *days >= 0).unwrap_or(DEFAULT_UPCOMING_DAYS)
    }

    fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT)
    }
}

fn views(events: Vec<super::domain::CalendarEvent>) -> Json<Vec<CalendarEventView>> {
    Json(events.iter().map(|event| event.view()).collect())
}

pub(crate) async fn list_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<ChildView>>> {
    let today = Local::now().date_naive();
    let list = children.list(user.id)?;
    Ok(Json(list.iter().map(|child| child.view(today)).collect()))
}

pub(crate) async fn create_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<ChildDraft>,
) -> ApiResult<impl IntoResponse> {
    let today = Local::now().date_naive();
    let child = children.create(user.id, draft, today)?;
    Ok((StatusCode::CREATED, Json(child.view(today))))
}

pub(crate) async fn get_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<u64>,
) -> ApiResult<Json<ChildView>> {
    let child = children.get(user.id, ChildId::from(child_id))?;
    Ok(Json(child.view(Local::now().date_naive())))
}

pub(crate) async fn update_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<u64>,
    Json(draft): Json<ChildDraft>,
) -> ApiResult<Json<ChildView>> {
    let today = Local::now().date_naive();
    let child = children.update(user.id, ChildId::from(child_id), draft, today)?;
    Ok(Json(child.view(today)))
}

pub(crate) async fn delete_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<u64>,
) -> ApiResult<StatusCode> {
    children.delete(user.id, ChildId::from(child_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn milestones_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<u64>,
) -> ApiResult<Json<Vec<Milestone>>> {
    Ok(Json(children.milestones(user.id, ChildId::from(child_id))?))
}

pub(crate) async fn add_milestone_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<u64>,
    Json(draft): Json<MilestoneDraft>,
) -> ApiResult<impl IntoResponse> {
    let milestone = children.add_milestone(user.id, ChildId::from(child_id), draft)?;
    Ok((StatusCode::CREATED, Json(milestone)))
}

pub(crate) async fn delete_milestone_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path((child_id, milestone_id)): Path<(u64, u64)>,
) -> ApiResult<StatusCode> {
    children.delete_milestone(
        user.id,
        ChildId::from(child_id),
        MilestoneId::from(milestone_id),
    )?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn vaccine_card_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<u64>,
) -> ApiResult<Json<VaccineCardView>> {
    Ok(Json(
        children.vaccine_card_view(user.id, ChildId::from(child_id))?,
    ))
}

pub(crate) async fn add_vaccine_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<u64>,
    Json(draft): Json<VaccineDraft>,
) -> ApiResult<impl IntoResponse> {
    let vaccine = children.add_vaccine(user.id, ChildId::from(child_id), draft)?;
    Ok((StatusCode::CREATED, Json(vaccine)))
}

pub(crate) async fn vaccine_statistics_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<u64>,
) -> ApiResult<Json<VaccineStatistics>> {
    Ok(Json(
        children.vaccine_statistics(user.id, ChildId::from(child_id))?,
    ))
}

pub(crate) async fn upcoming_vaccines_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<u64>,
    Query(query): Query<UpcomingQuery>,
) -> ApiResult<Json<Vec<Vaccine>>> {
    Ok(Json(children.upcoming_vaccines(
        user.id,
        ChildId::from(child_id),
        Local::now().date_naive(),
        query.days(),
        query.limit(),
    )?))
}

pub(crate) async fn delete_vaccine_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path((child_id, vaccine_id)): Path<(u64, u64)>,
) -> ApiResult<StatusCode> {
    children.delete_vaccine(user.id, ChildId::from(child_id), VaccineId::from(vaccine_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn administer_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(vaccine_id): Path<u64>,
) -> ApiResult<Json<Vaccine>> {
    Ok(Json(
        children.mark_vaccine_administered(user.id, VaccineId::from(vaccine_id))?,
    ))
}

pub(crate) async fn events_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<u64>,
    Query(range): Query<EventRange>,
) -> ApiResult<Json<Vec<CalendarEventView>>> {
    let events = children.events(user.id, ChildId::from(child_id), &range)?;
    Ok(views(events))
}

pub(crate) async fn add_event_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<u64>,
    Json(draft): Json<CalendarEventDraft>,
) -> ApiResult<impl IntoResponse> {
    let event = children.add_event(user.id, ChildId::from(child_id), draft)?;
    Ok((StatusCode::CREATED, Json(event.view())))
}

pub(crate) async fn event_statistics_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<u64>,
) -> ApiResult<Json<EventStatistics>> {
    Ok(Json(
        children.event_statistics(user.id, ChildId::from(child_id))?,
    ))
}

pub(crate) async fn upcoming_events_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<u64>,
) -> ApiResult<Json<Vec<CalendarEventView>>> {
    let events =
        children.upcoming_events(user.id, ChildId::from(child_id), Local::now().date_naive())?;
    Ok(views(events))
}

pub(crate) async fn reminders_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(child_id): Path<u64>,
    Query(query): Query<UpcomingQuery>,
) -> ApiResult<Json<Vec<CalendarEventView>>> {
    let events = children.upcoming_reminders(
        user.id,
        ChildId::from(child_id),
        Local::now().date_naive(),
        query.days.filter(|days| *days >= 0).unwrap_or(7),
        query.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT),
    )?;
    Ok(views(events))
}

pub(crate) async fn get_event_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<u64>,
) -> ApiResult<Json<CalendarEventView>> {
    let event = children.get_event(user.id, EventId::from(event_id))?;
    Ok(Json(event.view()))
}

pub(crate) async fn update_event_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<u64>,
    Json(patch): Json<CalendarEventPatch>,
) -> ApiResult<Json<CalendarEventView>> {
    let event = children.update_event(user.id, EventId::from(event_id), patch)?;
    Ok(Json(event.view()))
}

pub(crate) async fn move_event_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<u64>,
    Json(movement): Json<EventMove>,
) -> ApiResult<Json<CalendarEventView>> {
    let event = children.move_event(user.id, EventId::from(event_id), movement)?;
    Ok(Json(event.view()))
}

pub(crate) async fn delete_event_handler(
    State(children): State<Arc<ChildService>>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<u64>,
) -> ApiResult<StatusCode> {
    children.delete_event(user.id, EventId::from(event_id))?;
    Ok(StatusCode::NO_CONTENT)
}

impl From<ChildServiceError> for ApiError {
    fn from(value: ChildServiceError) -> Self {
        match value {
            ChildServiceError::Invalid(field) => field.into(),
            ChildServiceError::DuplicateName(_) => ApiError::conflict(value.to_string()),
            ChildServiceError::ChildNotFound
            | ChildServiceError::MilestoneNotFound
            | ChildServiceError::VaccineNotFound
            | ChildServiceError::EventNotFound => ApiError::not_found(value.to_string()),
            ChildServiceError::Forbidden => ApiError::forbidden(value.to_string()),
            ChildServiceError::Repository(err) => err.into(),
        }
    }
}
