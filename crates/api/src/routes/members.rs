//! Group member routes: listing, role changes and removal.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use domain::models::group::UpdateMemberRoleRequest;
use domain::models::{GroupMembership, GroupRole};
use persistence::repositories::GroupRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserSession;
use crate::response::success;
use crate::services::authorization::{require_membership, AuthzError};

/// A member as listed to other members.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: GroupRole,
    pub joined_at: DateTime<Utc>,
}

/// List group members, owner first.
///
/// GET /api/groups/:group_id/members
pub async fn list_members(
    State(state): State<AppState>,
    session: UserSession,
    Path(group_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());
    require_membership(&repo, group_id, session.user_id).await?;

    let members = repo.list_members(group_id).await?;
    let views: Vec<MemberView> = members
        .into_iter()
        .map(|m| MemberView {
            user_id: m.user_id,
            name: m.name,
            email: m.email,
            role: m.role.into(),
            joined_at: m.joined_at,
        })
        .collect();

    Ok(success(views))
}

/// Change a member's role between ADMIN and MEMBER. Owner only; the owner's
/// own role is untouchable.
///
/// PATCH /api/groups/:group_id/members/:user_id
pub async fn change_role(
    State(state): State<AppState>,
    session: UserSession,
    Path((group_id, user_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateMemberRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());
    let caller = require_membership(&repo, group_id, session.user_id).await?;

    if !caller.role.can_change_roles() {
        return Err(AuthzError::InsufficientRole.into());
    }

    let target = repo
        .find_membership(group_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".into()))?;
    if GroupRole::from(target.role) == GroupRole::Owner {
        return Err(ApiError::Forbidden(
            "The owner's role cannot be changed".into(),
        ));
    }

    let updated = repo
        .update_member_role(group_id, user_id, GroupRole::from(request.role).into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".into()))?;

    info!(
        group_id = %group_id,
        target_user_id = %user_id,
        role = %GroupRole::from(updated.role),
        "Member role changed"
    );

    Ok(success(GroupMembership::from(updated)))
}

/// Remove a member, or leave the group when removing oneself.
///
/// DELETE /api/groups/:group_id/members/:user_id
///
/// The owner can remove anyone but themself; an admin removes members or
/// leaves; a member may only leave.
pub async fn remove_member(
    State(state): State<AppState>,
    session: UserSession,
    Path((group_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());
    let caller = require_membership(&repo, group_id, session.user_id).await?;

    let target = repo
        .find_membership(group_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".into()))?;

    let is_self = user_id == session.user_id;
    if !caller
        .role
        .can_remove_member(target.role.into(), is_self)
    {
        return Err(AuthzError::InsufficientRole.into());
    }

    if !repo.remove_member(group_id, user_id).await? {
        return Err(ApiError::NotFound("Member not found".into()));
    }

    info!(
        group_id = %group_id,
        target_user_id = %user_id,
        removed_by = %session.user_id,
        "Member removed"
    );

    Ok(success(json!({ "removed": true })))
}
