//! External news articles and ingredient nutrition data.

pub mod domain;
pub mod news;
pub mod nutrition;
pub mod repository;
pub mod router;
pub mod service;


pub use domain::{ArticleCategory, ExternalArticle, NutrientSummary, NutritionRecord};
pub use news::{NewsApiClient, NewsItem, NewsSource};
pub use nutrition::{EdamamClient, NutritionSource};
pub use repository::{ArticleRepository, NutritionRepository};
pub use router::external_router;
pub use service::{ArticleService, ExternalError, NutritionService, RefreshReport};

/// Failure talking to a third-party HTTP source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("source responded with status {0}")]
    Status(u16),
    #[error("source rejected the request: {0}")]
    Rejected(String),
}
