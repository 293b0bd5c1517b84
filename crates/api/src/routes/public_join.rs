//! Public join-link routes: one shareable token per group that anyone with
//! an account can use to join as a member.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use domain::models::{Group, GroupMembership};
use persistence::entities::GroupRoleDb;
use persistence::repositories::GroupRepository;
use shared::token::generate_opaque_token;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserSession;
use crate::response::success;
use crate::services::authorization::require_admin;

/// What the join link shows before joining.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPreview {
    pub group_name: String,
    pub member_count: i64,
}

/// Enable the public join link, replacing any previous token. Owner or
/// admin only.
///
/// POST /api/groups/:group_id/public-invite
///
/// Regeneration invalidates the old link immediately.
pub async fn regenerate_token(
    State(state): State<AppState>,
    session: UserSession,
    Path(group_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());
    require_admin(&repo, group_id, session.user_id).await?;

    let token = generate_opaque_token();
    let group = repo
        .set_public_join_token(group_id, Some(&token))
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".into()))?;

    info!(group_id = %group_id, user_id = %session.user_id, "Public join link regenerated");

    Ok(success(Group::from(group)))
}

/// Disable the public join link. Owner or admin only.
///
/// DELETE /api/groups/:group_id/public-invite
pub async fn disable_token(
    State(state): State<AppState>,
    session: UserSession,
    Path(group_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());
    require_admin(&repo, group_id, session.user_id).await?;

    let group = repo
        .set_public_join_token(group_id, None)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".into()))?;

    info!(group_id = %group_id, user_id = %session.user_id, "Public join link disabled");

    Ok(success(Group::from(group)))
}

/// Join link preview. No authentication; a disabled or regenerated token is
/// indistinguishable from one that never existed.
///
/// GET /api/join/:token
pub async fn preview(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());
    let group = repo
        .find_by_public_token(&token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invalid join link".into()))?;

    let member_count = repo.member_count(group.id).await?;

    Ok(success(JoinPreview {
        group_name: group.name,
        member_count,
    }))
}

/// Join the group behind a public link as a regular member.
///
/// POST /api/join/:token
pub async fn join(
    State(state): State<AppState>,
    session: UserSession,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());
    let group = repo
        .find_by_public_token(&token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invalid join link".into()))?;

    if repo
        .find_membership(group.id, session.user_id)
        .await?
        .is_some()
    {
        return Err(ApiError::Validation(
            "You are already a member of this group".into(),
        ));
    }

    let membership = repo
        .add_member(group.id, session.user_id, GroupRoleDb::Member)
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => {
                ApiError::Validation("You are already a member of this group".into())
            }
            other => other,
        })?;

    info!(group_id = %group.id, user_id = %session.user_id, "Joined group via public link");

    Ok(success(json!({
        "group": Group::from(group),
        "membership": GroupMembership::from(membership),
    })))
}
