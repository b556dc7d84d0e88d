use super::domain::{ArticleCategory, ExternalArticle, NutritionRecord};
use crate::ids::ArticleId;
use crate::storage::RepositoryError;

pub trait ArticleRepository: Send + Sync {
    /// Inserts or replaces by URL, keeping the stored id and `created_at`.
    /// Returns the stored article and whether it was new.
    fn upsert_article(
        &self,
        article: ExternalArticle,
    ) -> Result<(ExternalArticle, bool), RepositoryError>;
    fn fetch_article(&self, id: ArticleId) -> Result<Option<ExternalArticle>, RepositoryError>;
    /// Newest publication first, optionally restricted to one category.
    fn articles(
        &self,
        category: Option<ArticleCategory>,
    ) -> Result<Vec<ExternalArticle>, RepositoryError>;
}

pub trait NutritionRepository: Send + Sync {
    /// `ingredient` is matched case-insensitively.
    fn fetch_record(&self, ingredient: &str) -> Result<Option<NutritionRecord>, RepositoryError>;
    fn upsert_record(&self, record: NutritionRecord) -> Result<NutritionRecord, RepositoryError>;
    /// Stored ingredient names in alphabetical order.
    fn ingredients(&self) -> Result<Vec<String>, RepositoryError>;
}
