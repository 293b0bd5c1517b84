//! Group management routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::group::{CreateGroupRequest, UpdateGroupRequest};
use domain::models::GroupRole;
use persistence::repositories::GroupRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserSession;
use crate::response::success;
use crate::services::authorization::{require_admin, require_membership, require_owner};

/// A group as seen by one of its members.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub id: Uuid,
    pub name: String,
    pub public_join_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub role: GroupRole,
    pub joined_at: DateTime<Utc>,
    pub member_count: i64,
    pub game_count: i64,
}

/// Create a group; the creator becomes its owner.
///
/// POST /api/groups
pub async fn create_group(
    State(state): State<AppState>,
    session: UserSession,
    Json(request): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = GroupRepository::new(state.pool.clone());
    let group = repo
        .create_group(request.name.trim(), session.user_id)
        .await?;

    info!(group_id = %group.id, user_id = %session.user_id, "Group created");

    let view = GroupView {
        id: group.id,
        name: group.name,
        public_join_token: group.public_join_token,
        created_at: group.created_at,
        updated_at: group.updated_at,
        role: GroupRole::Owner,
        joined_at: group.created_at,
        member_count: 1,
        game_count: 0,
    };

    Ok((StatusCode::CREATED, success(view)))
}

/// List the caller's groups, most recently joined first.
///
/// GET /api/groups
pub async fn list_groups(
    State(state): State<AppState>,
    session: UserSession,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());
    let groups = repo.find_user_groups(session.user_id).await?;

    let views: Vec<GroupView> = groups
        .into_iter()
        .map(|g| GroupView {
            id: g.id,
            name: g.name,
            public_join_token: g.public_join_token,
            created_at: g.created_at,
            updated_at: g.updated_at,
            role: g.role.into(),
            joined_at: g.joined_at,
            member_count: g.member_count,
            game_count: g.game_count,
        })
        .collect();

    Ok(success(views))
}

/// One group, for a member.
///
/// GET /api/groups/:group_id
pub async fn get_group(
    State(state): State<AppState>,
    session: UserSession,
    Path(group_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());
    let membership = require_membership(&repo, group_id, session.user_id).await?;

    let group = repo
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".into()))?;
    let member_count = repo.member_count(group_id).await?;
    let game_count = repo.game_count(group_id).await?;

    let view = GroupView {
        id: group.id,
        name: group.name,
        public_join_token: group.public_join_token,
        created_at: group.created_at,
        updated_at: group.updated_at,
        role: membership.role,
        joined_at: membership.joined_at,
        member_count,
        game_count,
    };

    Ok(success(view))
}

/// Rename a group. Owner or admin only.
///
/// PATCH /api/groups/:group_id
pub async fn rename_group(
    State(state): State<AppState>,
    session: UserSession,
    Path(group_id): Path<Uuid>,
    Json(request): Json<UpdateGroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = GroupRepository::new(state.pool.clone());
    require_admin(&repo, group_id, session.user_id).await?;

    let group = repo
        .update_name(group_id, request.name.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".into()))?;

    info!(group_id = %group.id, user_id = %session.user_id, "Group renamed");

    Ok(success(domain::models::Group::from(group)))
}

/// Delete a group and everything in it. Owner only.
///
/// DELETE /api/groups/:group_id
pub async fn delete_group(
    State(state): State<AppState>,
    session: UserSession,
    Path(group_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());
    require_owner(&repo, group_id, session.user_id).await?;

    if !repo.delete_group(group_id).await? {
        return Err(ApiError::NotFound("Group not found".into()));
    }

    info!(group_id = %group_id, user_id = %session.user_id, "Group deleted");

    Ok(success(json!({ "deleted": true })))
}
