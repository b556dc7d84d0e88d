//! NewsAPI client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::SourceError;

/// One article as NewsAPI reports it; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    #[serde(default)]
    pub source: Option<NewsItemSource>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewsItemSource {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsItem>,
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<NewsItem>, SourceError>;
}

/// Search expression used for a parenting topic keyword.
pub fn topic_query(topic: &str) -> String {
    let query = match topic.trim().to_lowercase().as_str() {
        "parenting" => "\"first-time parents\" OR \"new parents\" OR \"newborn care\" OR \"infant development\" OR \"baby milestones\"",
        "child nutrition" | "nutrition" => "\"baby food\" OR \"infant nutrition\" OR \"first foods\" OR \"introducing solids\" OR \"breastfeeding tips\"",
        "newborn" => "\"newborn care\" OR \"first month\" OR \"newborn sleep\" OR \"newborn feeding\"",
        "sleep" => "\"baby sleep\" OR \"infant sleep\" OR \"sleep training\" OR \"sleep schedule\"",
        "development" => "\"baby milestones\" OR \"infant development\" OR \"baby growth\" OR \"developmental stages\"",
        "health" => "\"baby health\" OR \"infant healthcare\" OR \"common baby illnesses\" OR \"baby doctor visits\"",
        "solids" => "\"introducing solids\" OR \"baby first foods\" OR \"baby led weaning\" OR \"infant nutrition\"",
        "safety" => "\"baby-proofing\" OR \"infant safety\" OR \"baby safety tips\" OR \"new parent safety\"",
        other if !other.is_empty() => return format!("\"{other}\""),
        _ => "\"first-time parents\" OR \"baby care\"",
    };
    query.to_string()
}

pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
}

impl NewsApiClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
            page_size: 10,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v2/everything", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn search(&self, query: &str) -> Result<Vec<NewsItem>, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SourceError::NotConfigured("NEWS_API_KEY"))?;
        let page_size = self.page_size.to_string();

        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("apiKey", api_key),
                ("q", query),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("page", "1"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body: NewsResponse = response.json().await?;
        if body.status.as_deref() == Some("error") {
            return Err(SourceError::Rejected(
                body.message.unwrap_or_else(|| "news source returned an error".to_string()),
            ));
        }
        debug!(query, articles = body.articles.len(), "news search completed");
        Ok(body.articles)
    }
}
