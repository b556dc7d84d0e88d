use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::ArticleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleCategory {
    Parenting,
    Nutrition,
}

/// News article mirrored from the news source; `url` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalArticle {
    pub id: ArticleId,
    pub title: String,
    pub source_name: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub category: ArticleCategory,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ExternalArticle {
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(needle_lower))
    }
}

/// Cached nutrition payload for one ingredient, keyed case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub ingredient: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NutritionRecord {
    pub fn summary(&self) -> NutrientSummary {
        let quantity = |code: &str| {
            self.data
                .get("totalNutrients")
                .and_then(|nutrients| nutrients.get(code))
                .and_then(|nutrient| nutrient.get("quantity"))
                .and_then(Value::as_f64)
                .unwrap_or(0.0)
        };
        NutrientSummary {
            ingredient: self.ingredient.clone(),
            calories: quantity("ENERC_KCAL"),
            protein: quantity("PROCNT"),
            fat: quantity("FAT"),
            carbs: quantity("CHOCDF"),
        }
    }
}

/// Whether a nutrition payload carries a non-empty `totalNutrients` table.
pub fn has_nutrients(data: &Value) -> bool {
    data.get("totalNutrients")
        .and_then(Value::as_object)
        .is_some_and(|nutrients| !nutrients.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientSummary {
    pub ingredient: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}
