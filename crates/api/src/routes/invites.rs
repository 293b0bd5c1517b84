//! Invite lifecycle routes: creation, listing, responding, revocation and
//! the unauthenticated link preview.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::invite::{
    default_expiry, effective_status, CreateInviteRequest, GroupInvite, InviteTarget,
    RespondToInviteRequest,
};
use domain::models::InviteStatus;
use persistence::entities::{GroupInviteEntity, InviteWithContextEntity};
use persistence::repositories::{GroupRepository, InviteRepository, UserRepository};
use shared::token::generate_opaque_token;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserSession;
use crate::middleware::metrics::record_invite_created;
use crate::response::success;
use crate::services::authorization::{require_admin, require_membership};

/// An invite with its group and inviter context, as shown in invite lists
/// and inboxes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteView {
    pub id: Uuid,
    pub group_id: Uuid,
    pub group_name: String,
    pub inviter_name: String,
    pub invitee_id: Option<Uuid>,
    pub invitee_email: Option<String>,
    pub token: String,
    pub status: InviteStatus,
    pub expires_at: DateTime<Utc>,
    pub seen_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub member_count: i64,
}

impl InviteView {
    fn from_entity(entity: InviteWithContextEntity, now: DateTime<Utc>) -> Self {
        let status = effective_status(entity.status.into(), entity.expires_at, now);
        Self {
            id: entity.id,
            group_id: entity.group_id,
            group_name: entity.group_name,
            inviter_name: entity.inviter_name,
            invitee_id: entity.invitee_id,
            invitee_email: entity.invitee_email,
            token: entity.token,
            status,
            expires_at: entity.expires_at,
            seen_at: entity.seen_at,
            created_at: entity.created_at,
            member_count: entity.member_count,
        }
    }
}

/// What an invite link shows before authentication.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitePreview {
    pub group_name: String,
    pub inviter_name: String,
    pub member_count: i64,
    pub status: InviteStatus,
    pub expires_at: DateTime<Utc>,
}

/// Create an invite addressed to a user or an email. Owner or admin only.
///
/// POST /api/groups/:group_id/invites
pub async fn create_invite(
    State(state): State<AppState>,
    session: UserSession,
    Path(group_id): Path<Uuid>,
    Json(request): Json<CreateInviteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;
    let target = request
        .target()
        .map_err(|msg| ApiError::Validation(msg.into()))?;

    let groups = GroupRepository::new(state.pool.clone());
    require_admin(&groups, group_id, session.user_id).await?;

    let users = UserRepository::new(state.pool.clone());

    // An email belonging to an existing account becomes an in-app invite.
    let (invitee_id, invitee_email) = match target {
        InviteTarget::UserId(user_id) => {
            users
                .find_by_id(user_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
            (Some(user_id), None)
        }
        InviteTarget::Email(email) => match users.find_by_email(&email).await? {
            Some(user) => (Some(user.id), None),
            None => (None, Some(email)),
        },
    };

    if let Some(user_id) = invitee_id {
        if groups.find_membership(group_id, user_id).await?.is_some() {
            return Err(ApiError::Validation(
                "This user is already a member of the group".into(),
            ));
        }
    }

    let invites = InviteRepository::new(state.pool.clone());
    let now = Utc::now();
    if invites
        .pending_exists_for_target(group_id, invitee_id, invitee_email.as_deref(), now)
        .await?
    {
        return Err(ApiError::Validation(
            "A pending invite for this person already exists".into(),
        ));
    }

    let token = generate_opaque_token();
    let invite = invites
        .create_invite(
            group_id,
            session.user_id,
            invitee_id,
            invitee_email.as_deref(),
            &token,
            default_expiry(now),
        )
        .await?;

    record_invite_created();
    info!(
        invite_id = %invite.id,
        group_id = %group_id,
        inviter_id = %session.user_id,
        "Invite created"
    );

    Ok((StatusCode::CREATED, success(GroupInvite::from(invite))))
}

/// Pending invites of a group. Any member may see who has been invited.
///
/// GET /api/groups/:group_id/invites
pub async fn list_group_invites(
    State(state): State<AppState>,
    session: UserSession,
    Path(group_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let groups = GroupRepository::new(state.pool.clone());
    require_membership(&groups, group_id, session.user_id).await?;

    let invites = InviteRepository::new(state.pool.clone());
    let now = Utc::now();
    invites.expire_overdue_for_group(group_id, now).await?;

    let pending = invites.list_group_pending(group_id).await?;
    let views: Vec<InviteView> = pending
        .into_iter()
        .map(|e| InviteView::from_entity(e, now))
        .collect();

    Ok(success(views))
}

/// Revoke a pending invite. Owner or admin only; responded invites stay.
///
/// DELETE /api/groups/:group_id/invites/:invite_id
pub async fn revoke_invite(
    State(state): State<AppState>,
    session: UserSession,
    Path((group_id, invite_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let groups = GroupRepository::new(state.pool.clone());
    require_admin(&groups, group_id, session.user_id).await?;

    let invites = InviteRepository::new(state.pool.clone());
    let invite = invites
        .find_by_id(invite_id)
        .await?
        .filter(|i| i.group_id == group_id)
        .ok_or_else(|| ApiError::NotFound("Invite not found".into()))?;

    if !invites.delete_pending(invite.id).await? {
        return Err(ApiError::Validation(
            "Only pending invites can be revoked".into(),
        ));
    }

    info!(invite_id = %invite_id, group_id = %group_id, "Invite revoked");

    Ok(success(json!({ "revoked": true })))
}

/// The caller's pending invites, by account or email address.
///
/// GET /api/user/invites
pub async fn list_my_invites(
    State(state): State<AppState>,
    session: UserSession,
) -> Result<impl IntoResponse, ApiError> {
    let email = caller_email(&state, session.user_id).await?;

    let invites = InviteRepository::new(state.pool.clone());
    let now = Utc::now();
    invites
        .expire_overdue_for_user(session.user_id, &email, now)
        .await?;

    let pending = invites.list_user_pending(session.user_id, &email).await?;
    let views: Vec<InviteView> = pending
        .into_iter()
        .map(|e| InviteView::from_entity(e, now))
        .collect();

    Ok(success(views))
}

/// The caller's full invite history, responded and expired included.
///
/// GET /api/user/invites/history
pub async fn my_invite_history(
    State(state): State<AppState>,
    session: UserSession,
) -> Result<impl IntoResponse, ApiError> {
    let email = caller_email(&state, session.user_id).await?;

    let invites = InviteRepository::new(state.pool.clone());
    let now = Utc::now();
    let history = invites.list_user_history(session.user_id, &email).await?;
    let views: Vec<InviteView> = history
        .into_iter()
        .map(|e| InviteView::from_entity(e, now))
        .collect();

    Ok(success(views))
}

/// Record that the addressee has seen the invite. First call wins.
///
/// POST /api/user/invites/:invite_id/seen
pub async fn mark_invite_seen(
    State(state): State<AppState>,
    session: UserSession,
    Path(invite_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let invites = InviteRepository::new(state.pool.clone());
    let invite = invites
        .find_by_id(invite_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invite not found".into()))?;

    require_addressee(&state, &invite, session.user_id).await?;

    invites.mark_seen(invite_id, Utc::now()).await?;

    Ok(success(json!({ "seen": true })))
}

/// Accept or decline one of the caller's invites.
///
/// POST /api/user/invites/:invite_id/respond
pub async fn respond_by_id(
    State(state): State<AppState>,
    session: UserSession,
    Path(invite_id): Path<Uuid>,
    Json(request): Json<RespondToInviteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let invites = InviteRepository::new(state.pool.clone());
    let invite = invites
        .find_by_id(invite_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invite not found".into()))?;

    respond(&state, &invites, invite, session.user_id, request.accept).await
}

/// Accept or decline an invite reached through its link.
///
/// POST /api/invites/:token/respond
pub async fn respond_by_token(
    State(state): State<AppState>,
    session: UserSession,
    Path(token): Path<String>,
    Json(request): Json<RespondToInviteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let invites = InviteRepository::new(state.pool.clone());
    let invite = invites
        .find_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invite not found".into()))?;

    respond(&state, &invites, invite, session.user_id, request.accept).await
}

/// Invite link preview. No authentication; the token itself is the secret.
///
/// GET /api/invites/:token
pub async fn preview_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let invites = InviteRepository::new(state.pool.clone());
    let entity = invites
        .find_by_token_with_context(&token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invite not found".into()))?;

    let preview = InvitePreview {
        group_name: entity.group_name,
        inviter_name: entity.inviter_name,
        member_count: entity.member_count,
        status: effective_status(entity.status.into(), entity.expires_at, Utc::now()),
        expires_at: entity.expires_at,
    };

    Ok(success(preview))
}

async fn respond(
    state: &AppState,
    invites: &InviteRepository,
    invite: GroupInviteEntity,
    user_id: Uuid,
    accept: bool,
) -> Result<axum::response::Response, ApiError> {
    require_addressee(state, &invite, user_id).await?;

    let now = Utc::now();
    if invites.expire_if_due(invite.id, now).await? {
        return Err(ApiError::Validation("This invite has expired".into()));
    }
    if InviteStatus::from(invite.status).is_terminal() {
        return Err(ApiError::Validation(
            "This invite is no longer pending".into(),
        ));
    }

    if accept {
        let accepted = invites
            .accept_invite(invite.id, invite.group_id, user_id)
            .await
            .map_err(|e| match ApiError::from(e) {
                ApiError::Conflict(_) => {
                    ApiError::Validation("You are already a member of this group".into())
                }
                other => other,
            })?;
        if !accepted {
            return Err(ApiError::Validation(
                "This invite is no longer pending".into(),
            ));
        }

        info!(invite_id = %invite.id, group_id = %invite.group_id, user_id = %user_id, "Invite accepted");
        Ok(success(json!({ "accepted": true, "groupId": invite.group_id })).into_response())
    } else {
        if !invites.decline_invite(invite.id).await? {
            return Err(ApiError::Validation(
                "This invite is no longer pending".into(),
            ));
        }

        info!(invite_id = %invite.id, user_id = %user_id, "Invite declined");
        Ok(success(json!({ "accepted": false })).into_response())
    }
}

/// The invite must be addressed to this user, by id or by their account
/// email. Anyone else gets a 403 even with a valid link.
async fn require_addressee(
    state: &AppState,
    invite: &GroupInviteEntity,
    user_id: Uuid,
) -> Result<(), ApiError> {
    if invite.invitee_id == Some(user_id) {
        return Ok(());
    }

    if let Some(invite_email) = invite.invitee_email.as_deref() {
        let email = caller_email(state, user_id).await?;
        if email.eq_ignore_ascii_case(invite_email) {
            return Ok(());
        }
    }

    Err(ApiError::Forbidden(
        "This invite is not addressed to you".into(),
    ))
}

async fn caller_email(state: &AppState, user_id: Uuid) -> Result<String, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".into()))?;
    Ok(user.email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use persistence::entities::InviteStatusDb;

    fn entity(status: InviteStatusDb, expires_at: DateTime<Utc>) -> InviteWithContextEntity {
        InviteWithContextEntity {
            id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            inviter_id: Uuid::new_v4(),
            invitee_id: None,
            invitee_email: Some("maria@example.com".to_string()),
            token: "tok".to_string(),
            status,
            expires_at,
            seen_at: None,
            created_at: Utc::now(),
            group_name: "Friday Night".to_string(),
            inviter_name: "Alice".to_string(),
            member_count: 4,
        }
    }

    #[test]
    fn test_invite_view_reports_overdue_pending_as_expired() {
        let now = Utc::now();
        let view = InviteView::from_entity(entity(InviteStatusDb::Pending, now - Duration::hours(1)), now);
        assert_eq!(view.status, InviteStatus::Expired);

        let view = InviteView::from_entity(entity(InviteStatusDb::Pending, now + Duration::hours(1)), now);
        assert_eq!(view.status, InviteStatus::Pending);
    }

    #[test]
    fn test_invite_view_keeps_terminal_status() {
        let now = Utc::now();
        let view = InviteView::from_entity(entity(InviteStatusDb::Declined, now - Duration::hours(1)), now);
        assert_eq!(view.status, InviteStatus::Declined);
    }

    #[test]
    fn test_invite_view_serializes_camel_case() {
        let now = Utc::now();
        let view = InviteView::from_entity(entity(InviteStatusDb::Pending, now + Duration::days(7)), now);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["groupName"], "Friday Night");
        assert_eq!(json["inviterName"], "Alice");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["memberCount"], 4);
    }
}
