//! Edamam nutrition-data client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::SourceError;

#[async_trait]
pub trait NutritionSource: Send + Sync {
    async fn nutrition(&self, ingredient: &str) -> Result<Value, SourceError>;
}

pub struct EdamamClient {
    client: Client,
    base_url: String,
    app_id: Option<String>,
    app_key: Option<String>,
}

impl EdamamClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        app_id: Option<String>,
        app_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            app_id,
            app_key,
        }
    }
}

#[async_trait]
impl NutritionSource for EdamamClient {
    async fn nutrition(&self, ingredient: &str) -> Result<Value, SourceError> {
        let (Some(app_id), Some(app_key)) = (self.app_id.as_deref(), self.app_key.as_deref())
        else {
            return Err(SourceError::NotConfigured("EDAMAM_APP_ID/EDAMAM_APP_KEY"));
        };

        let response = self
            .client
            .get(format!(
                "{}/api/nutrition-data",
                self.base_url.trim_end_matches('/')
            ))
            .query(&[("app_id", app_id), ("app_key", app_key), ("ingr", ingredient)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn client_queries_ingredient() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/nutrition-data")
                .query_param("app_id", "id")
                .query_param("app_key", "key")
                .query_param("ingr", "1 banana");
            then.status(200)
                .json_body(json!({"calories": 105, "totalNutrients": {"FAT": {"quantity": 0.4}}}));
        });

        let client = EdamamClient::new(
            Client::new(),
            server.base_url(),
            Some("id".into()),
            Some("key".into()),
        );
        let payload = client.nutrition("1 banana").await.expect("lookup succeeds");

        mock.assert();
        assert_eq!(payload["calories"], 105);
    }

    #[tokio::test]
    async fn server_errors_surface_as_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/nutrition-data");
            then.status(500);
        });
        let client = EdamamClient::new(
            Client::new(),
            server.base_url(),
            Some("id".into()),
            Some("key".into()),
        );
        assert!(matches!(
            client.nutrition("rice").await,
            Err(SourceError::Status(500))
        ));
    }
}
