//! Dashboard routes. The repositories fetch raw participant rows; all
//! aggregation happens in the pure domain services.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use domain::services::aggregation;
use persistence::repositories::{DashboardRepository, GroupRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserSession;
use crate::response::success;
use crate::services::authorization::require_membership;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub group_id: Option<Uuid>,
}

/// Group dashboard: standings, summary and recent games.
///
/// GET /api/groups/:group_id/dashboard?startDate=...&endDate=...
pub async fn group_dashboard(
    State(state): State<AppState>,
    session: UserSession,
    Path(group_id): Path<Uuid>,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let groups = GroupRepository::new(state.pool.clone());
    require_membership(&groups, group_id, session.user_id).await?;

    let repo = DashboardRepository::new(state.pool.clone());
    let rows: Vec<_> = repo
        .group_participation(group_id, query.start_date, query.end_date)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(success(aggregation::group_dashboard(&rows)))
}

/// The caller's personal dashboard across their groups.
///
/// GET /api/dashboard?startDate=...&endDate=...&groupId=...
pub async fn user_dashboard(
    State(state): State<AppState>,
    session: UserSession,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = DashboardRepository::new(state.pool.clone());
    let rows: Vec<_> = repo
        .user_participation(
            session.user_id,
            query.start_date,
            query.end_date,
            query.group_id,
        )
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(success(aggregation::user_dashboard(&rows)))
}
