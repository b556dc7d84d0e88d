use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use super::domain::{ArticleCategory, ExternalArticle, NutrientSummary, NutritionRecord};
use super::service::{ArticleService, ExternalError, NutritionService, RefreshReport};
use super::SourceError;
use crate::api::{ApiError, ApiResult, AppContext, CurrentUser};
use crate::ids::ArticleId;

pub fn external_router() -> Router<AppContext> {
    Router::new()
        .route("/api/v1/articles", get(list_articles_handler))
        .route("/api/v1/articles/search", get(search_articles_handler))
        .route("/api/v1/articles/refresh", post(refresh_handler))
        .route("/api/v1/articles/:article_id", get(article_handler))
        .route("/api/v1/nutrition/ingredients", get(ingredients_handler))
        .route("/api/v1/nutrition/compare", post(compare_handler))
        .route("/api/v1/nutrition/:ingredient", get(lookup_handler))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ArticleQuery {
    #[serde(default)]
    pub(crate) category: Option<ArticleCategory>,
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    #[serde(default)]
    pub(crate) q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RefreshBody {
    #[serde(default)]
    pub(crate) topic: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompareBody {
    pub(crate) ingredients: Vec<String>,
}

pub(crate) async fn list_articles_handler(
    State(articles): State<Arc<ArticleService>>,
    Query(query): Query<ArticleQuery>,
) -> ApiResult<Json<Vec<ExternalArticle>>> {
    Ok(Json(articles.list(query.category, query.limit)?))
}

pub(crate) async fn search_articles_handler(
    State(articles): State<Arc<ArticleService>>,
    Query(query): Query<ArticleQuery>,
) -> ApiResult<Json<Vec<ExternalArticle>>> {
    let term = query.q.unwrap_or_default();
    Ok(Json(articles.search(&term, query.category)?))
}

pub(crate) async fn article_handler(
    State(articles): State<Arc<ArticleService>>,
    Path(article_id): Path<u64>,
) -> ApiResult<Json<ExternalArticle>> {
    Ok(Json(articles.get(ArticleId::from(article_id))?))
}

pub(crate) async fn refresh_handler(
    State(articles): State<Arc<ArticleService>>,
    CurrentUser(user): CurrentUser,
    body: Option<Json<RefreshBody>>,
) -> ApiResult<Json<RefreshReport>> {
    if !user.is_staff {
        return Err(ApiError::forbidden("staff access required"));
    }
    let topic = body.and_then(|Json(body)| body.topic);
    Ok(Json(articles.refresh(topic.as_deref(), Utc::now()).await?))
}

pub(crate) async fn lookup_handler(
    State(nutrition): State<Arc<NutritionService>>,
    Path(ingredient): Path<String>,
) -> ApiResult<Json<NutritionRecord>> {
    Ok(Json(nutrition.lookup(&ingredient, Utc::now()).await?))
}

pub(crate) async fn compare_handler(
    State(nutrition): State<Arc<NutritionService>>,
    Json(body): Json<CompareBody>,
) -> ApiResult<Json<Vec<NutrientSummary>>> {
    Ok(Json(nutrition.compare(&body.ingredients, Utc::now()).await?))
}

pub(crate) async fn ingredients_handler(
    State(nutrition): State<Arc<NutritionService>>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(nutrition.ingredients()?))
}

impl From<ExternalError> for ApiError {
    fn from(value: ExternalError) -> Self {
        match value {
            ExternalError::Invalid(field) => field.into(),
            ExternalError::ArticleNotFound | ExternalError::NoNutritionData(_) => {
                ApiError::not_found(value.to_string())
            }
            ExternalError::Source(SourceError::NotConfigured(_)) => {
                ApiError::internal(value.to_string())
            }
            ExternalError::Source(_) => ApiError::upstream(value.to_string()),
            ExternalError::Repository(err) => err.into(),
        }
    }
}
