//! Site-wide search across forum posts and approved guides.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, ApiResult, AppContext};
use crate::forum::{ForumPost, ForumService, ForumServiceError};
use crate::guides::{Guide, GuideServiceError, GuideService, GuideType};

/// Hits per section when searching everything at once.
pub const ALL_SECTION_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    Forum,
    ParentsGuide,
    NutritionGuide,
    #[default]
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    pub query: String,
    #[serde(rename = "type")]
    pub scope: SearchScope,
    pub posts: Vec<ForumPost>,
    pub guides: Vec<Guide>,
}

pub struct SearchService {
    forum: Arc<ForumService>,
    guides: Arc<GuideService>,
}

impl SearchService {
    pub fn new(forum: Arc<ForumService>, guides: Arc<GuideService>) -> Self {
        Self { forum, guides }
    }

    pub fn search(&self, query: &str, scope: SearchScope) -> Result<SearchResults, SearchError> {
        let query = query.trim().to_string();
        let mut results = SearchResults {
            query,
            scope,
            ..SearchResults::default()
        };
        if results.query.is_empty() {
            return Ok(results);
        }

        let term = results.query.as_str();
        match scope {
            SearchScope::Forum => results.posts = self.forum.search(term, None)?,
            SearchScope::ParentsGuide => {
                results.guides = self.guides.shelf(GuideType::Parent).search(term, None)?;
            }
            SearchScope::NutritionGuide => {
                results.guides = self.guides.shelf(GuideType::Nutrition).search(term, None)?;
            }
            SearchScope::All => {
                results.posts = self.forum.search(term, Some(ALL_SECTION_LIMIT))?;
                let mut guides = self.guides.shelf(GuideType::Parent).search(term, None)?;
                guides.extend(self.guides.shelf(GuideType::Nutrition).search(term, None)?);
                guides.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                guides.truncate(ALL_SECTION_LIMIT);
                results.guides = guides;
            }
        }
        Ok(results)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Forum(#[from] ForumServiceError),
    #[error(transparent)]
    Guides(#[from] GuideServiceError),
}

impl From<SearchError> for ApiError {
    fn from(value: SearchError) -> Self {
        match value {
            SearchError::Forum(err) => err.into(),
            SearchError::Guides(err) => err.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    pub(crate) q: String,
    #[serde(rename = "type", default)]
    pub(crate) scope: SearchScope,
}

pub fn search_router() -> Router<AppContext> {
    Router::new().route("/api/v1/search", get(search_handler))
}

pub(crate) async fn search_handler(
    State(search): State<Arc<SearchService>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResults>> {
    Ok(Json(search.search(&query.q, query.scope)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forum::{ForumCategory, PostDraft};
    use crate::guides::GuideSubmission;
    use crate::testing::{send, TestApp};
    use axum::http::{Method, StatusCode};

    fn seed(app: &TestApp) {
        let author = app.user("pat");
        let admin = app.staff("admin");
        for index in 0..7 {
            app.context
                .forum
                .create(
                    &author,
                    PostDraft {
                        title: format!("Sleep thread {index}"),
                        desc: "Naps are getting shorter".to_string(),
                        category: ForumCategory::Sleep,
                    },
                )
                .expect("post");
        }
        for (guide_type, title) in [
            (GuideType::Parent, "Sleep cues to watch"),
            (GuideType::Nutrition, "Bedtime snacks and sleep"),
            (GuideType::Parent, "Pending sleep draft"),
        ] {
            let guide = app
                .context
                .guides
                .submit(
                    &author,
                    guide_type,
                    GuideSubmission {
                        title: title.to_string(),
                        desc: format!("{title}. ").repeat(20),
                        ..GuideSubmission::default()
                    },
                )
                .expect("guide");
            if !title.starts_with("Pending") {
                app.context
                    .moderation
                    .approve(&admin, guide.id, None)
                    .expect("approved");
            }
        }
    }

    #[test]
    fn scopes_limit_what_is_searched() {
        let app = TestApp::new();
        seed(&app);
        let search = &app.context.search;

        let all = search.search("  sleep ", SearchScope::All).expect("all");
        assert_eq!(all.query, "sleep");
        assert_eq!(all.posts.len(), ALL_SECTION_LIMIT);
        assert_eq!(all.guides.len(), 2);

        let forum = search.search("sleep", SearchScope::Forum).expect("forum");
        assert_eq!(forum.posts.len(), 7);
        assert!(forum.guides.is_empty());

        let nutrition = search
            .search("sleep", SearchScope::NutritionGuide)
            .expect("nutrition");
        assert_eq!(nutrition.guides.len(), 1);
        assert_eq!(nutrition.guides[0].guide_type, GuideType::Nutrition);

        let empty = search.search("   ", SearchScope::All).expect("empty");
        assert!(empty.posts.is_empty() && empty.guides.is_empty());
    }

    #[tokio::test]
    async fn search_endpoint_reports_scope() {
        let app = TestApp::new();
        seed(&app);
        let (status, body) = send(
            &app.router(),
            Method::GET,
            "/api/v1/search?q=cues&type=parents_guide",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "parents_guide");
        assert_eq!(body["guides"][0]["title"], "Sleep cues to watch");
    }
}
