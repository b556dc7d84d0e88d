//! REST surface: shared state, extractors, the error envelope and the
//! merged `/api/v1` router.

pub mod context;
pub mod error;
pub mod extract;

use axum::Router;

pub use context::{AppContext, Collaborators};
pub use error::{ApiError, ApiResult};
pub use extract::{BearerToken, CurrentUser, MaybeUser};

use crate::accounts::account_router;
use crate::children::child_router;
use crate::contact::contact_router;
use crate::engagement::engagement_router;
use crate::external::external_router;
use crate::forum::forum_router;
use crate::guides::guide_router;
use crate::notifications::notification_router;
use crate::search::search_router;

/// Every `/api/v1` route bound to `context`.
pub fn api_router(context: AppContext) -> Router {
    Router::new()
        .merge(account_router())
        .merge(child_router())
        .merge(notification_router())
        .merge(engagement_router())
        .merge(forum_router())
        .merge(guide_router())
        .merge(contact_router())
        .merge(external_router())
        .merge(search_router())
        .with_state(context)
}
