use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    has_nutrients, ArticleCategory, ExternalArticle, NutrientSummary, NutritionRecord,
};
use super::news::{topic_query, NewsItem, NewsSource};
use super::nutrition::NutritionSource;
use super::repository::{ArticleRepository, NutritionRepository};
use super::SourceError;
use crate::ids::ArticleId;
use crate::storage::RepositoryError;
use crate::validation::FieldError;

pub const NUTRITION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub fetched: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Mirrors news articles into the local store.
pub struct ArticleService {
    articles: Arc<dyn ArticleRepository>,
    source: Arc<dyn NewsSource>,
}

impl ArticleService {
    pub fn new(articles: Arc<dyn ArticleRepository>, source: Arc<dyn NewsSource>) -> Self {
        Self { articles, source }
    }

    pub fn list(
        &self,
        category: Option<ArticleCategory>,
        limit: Option<usize>,
    ) -> Result<Vec<ExternalArticle>, ExternalError> {
        let mut articles = self.articles.articles(category)?;
        if let Some(limit) = limit {
            articles.truncate(limit);
        }
        Ok(articles)
    }

    pub fn get(&self, id: ArticleId) -> Result<ExternalArticle, ExternalError> {
        self.articles
            .fetch_article(id)?
            .ok_or(ExternalError::ArticleNotFound)
    }

    /// Case-insensitive match on title and description.
    pub fn search(
        &self,
        term: &str,
        category: Option<ArticleCategory>,
    ) -> Result<Vec<ExternalArticle>, ExternalError> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .articles
            .articles(category)?
            .into_iter()
            .filter(|article| article.matches(&needle))
            .collect())
    }

    /// Pulls `topic` into the parenting feed, or both default feeds when absent.
    pub async fn refresh(
        &self,
        topic: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<RefreshReport, ExternalError> {
        let feeds: Vec<(String, ArticleCategory)> = match topic {
            Some(topic) => vec![(topic_query(topic), ArticleCategory::Parenting)],
            None => vec![
                (topic_query("parenting"), ArticleCategory::Parenting),
                (topic_query("child nutrition"), ArticleCategory::Nutrition),
            ],
        };

        let mut report = RefreshReport::default();
        for (query, category) in feeds {
            let items = self.source.search(&query).await?;
            report.fetched += items.len();
            for item in items {
                let Some(article) = article_from(item, category, now) else {
                    report.skipped += 1;
                    continue;
                };
                let (_, created) = self.articles.upsert_article(article)?;
                if created {
                    report.created += 1;
                } else {
                    report.updated += 1;
                }
            }
        }

        info!(
            fetched = report.fetched,
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            "article refresh finished"
        );
        Ok(report)
    }
}

/// Articles without a title or URL are dropped; a missing or malformed
/// `publishedAt` falls back to `now`.
fn article_from(
    item: NewsItem,
    category: ArticleCategory,
    now: DateTime<Utc>,
) -> Option<ExternalArticle> {
    let title = item.title.filter(|title| !title.trim().is_empty())?;
    let url = item.url.filter(|url| !url.trim().is_empty())?;
    let published_at = item
        .published_at
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or(now);

    Some(ExternalArticle {
        id: ArticleId::UNASSIGNED,
        title: truncate_chars(title.trim(), 255),
        source_name: item
            .source
            .and_then(|source| source.name)
            .map(|name| truncate_chars(&name, 100))
            .unwrap_or_else(|| "Unknown".to_string()),
        author: item.author.map(|author| truncate_chars(&author, 100)),
        description: item.description,
        url,
        image_url: item.url_to_image,
        published_at,
        category,
        content: item.content,
        created_at: now,
    })
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Ingredient nutrition with a 24 hour local cache.
pub struct NutritionService {
    records: Arc<dyn NutritionRepository>,
    source: Arc<dyn NutritionSource>,
}

impl NutritionService {
    pub fn new(records: Arc<dyn NutritionRepository>, source: Arc<dyn NutritionSource>) -> Self {
        Self { records, source }
    }

    /// Fresh records are served locally; a failing source falls back to a stale one.
    pub async fn lookup(
        &self,
        ingredient: &str,
        now: DateTime<Utc>,
    ) -> Result<NutritionRecord, ExternalError> {
        let key = ingredient.trim().to_lowercase();
        if key.is_empty() {
            return Err(FieldError::new("ingredient", "enter an ingredient").into());
        }

        let stored = self.records.fetch_record(&key)?;
        if let Some(record) = &stored {
            if now - record.updated_at < Duration::hours(NUTRITION_TTL_HOURS) {
                return Ok(record.clone());
            }
        }

        match self.source.nutrition(&key).await {
            Ok(data) if has_nutrients(&data) => {
                let record = NutritionRecord {
                    created_at: stored.as_ref().map_or(now, |record| record.created_at),
                    ingredient: key,
                    data,
                    updated_at: now,
                };
                Ok(self.records.upsert_record(record)?)
            }
            Ok(_) => stored.ok_or(ExternalError::NoNutritionData(key)),
            Err(err) => {
                warn!(ingredient = %key, error = %err, "nutrition source failed");
                stored.ok_or(ExternalError::Source(err))
            }
        }
    }

    pub async fn compare(
        &self,
        ingredients: &[String],
        now: DateTime<Utc>,
    ) -> Result<Vec<NutrientSummary>, ExternalError> {
        let wanted: Vec<&str> = ingredients
            .iter()
            .map(|ingredient| ingredient.trim())
            .filter(|ingredient| !ingredient.is_empty())
            .collect();
        if wanted.len() < 2 {
            return Err(
                FieldError::new("ingredients", "choose at least two ingredients to compare").into(),
            );
        }

        let mut summaries = Vec::with_capacity(wanted.len());
        for ingredient in wanted {
            summaries.push(self.lookup(ingredient, now).await?.summary());
        }
        Ok(summaries)
    }

    pub fn ingredients(&self) -> Result<Vec<String>, ExternalError> {
        Ok(self.records.ingredients()?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExternalError {
    #[error(transparent)]
    Invalid(#[from] FieldError),
    #[error("article not found")]
    ArticleNotFound,
    #[error("no nutrition data for {0}")]
    NoNutritionData(String),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
