//! User search for the invite picker.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use domain::models::PublicUser;
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserSession;
use crate::response::success;

const SEARCH_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Search users by name or email substring.
///
/// GET /api/users/search?q=...
///
/// The caller never appears in their own results; an empty query returns an
/// empty list rather than everyone.
pub async fn search(
    State(state): State<AppState>,
    session: UserSession,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let needle = query.q.as_deref().map(str::trim).unwrap_or_default();
    if needle.is_empty() {
        return Ok(success(Vec::<PublicUser>::new()));
    }

    let repo = UserRepository::new(state.pool.clone());
    let users = repo
        .search_users(needle, session.user_id, SEARCH_LIMIT)
        .await?;

    Ok(success(
        users.into_iter().map(PublicUser::from).collect::<Vec<_>>(),
    ))
}
