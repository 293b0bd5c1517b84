//! Admin back-office routes. A single configured operator account, its own
//! cookie and realm, short sessions.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use persistence::repositories::AdminRepository;
use shared::pagination::{PageInfo, PageParams};
use shared::password;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminSession;
use crate::response::success;
use crate::services::cookies::{build_clear_cookie, build_session_cookie, ADMIN_SESSION_COOKIE};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

/// A user as listed in the back-office.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub group_count: i64,
    pub game_count: i64,
}

/// A group as listed in the back-office.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminGroupView {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub member_count: i64,
    pub game_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserList {
    pub users: Vec<AdminUserView>,
    pub page_info: PageInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminGroupList {
    pub groups: Vec<AdminGroupView>,
    pub page_info: PageInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsView {
    pub total_users: i64,
    pub total_groups: i64,
    pub total_games: i64,
    pub recent_signups: Vec<AdminSignupView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSignupView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Authenticate the configured operator account.
///
/// POST /api/admin/auth/login
///
/// The failure message never says which of username and password was wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<AdminLoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let auth = &state.config.auth;

    let username_ok = request.username == auth.admin_username;
    let password_ok = password::verify_password(&request.password, &auth.admin_password_hash)
        .map_err(|e| ApiError::Internal(format!("Admin password verification failed: {}", e)))?;

    if !username_ok || !password_ok {
        warn!(username = %request.username, "Failed admin login attempt");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let token = state
        .admin_keys
        .issue(&auth.admin_username)
        .map_err(|e| ApiError::Internal(format!("Failed to issue admin session: {}", e)))?;
    let cookie = build_session_cookie(
        ADMIN_SESSION_COOKIE,
        &token,
        auth.admin_session_expiry_secs,
        state.config.security.cookie_secure,
    );

    info!(username = %auth.admin_username, "Admin logged in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        success(json!({ "username": auth.admin_username })),
    ))
}

/// End the admin session.
///
/// POST /api/admin/auth/logout
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = build_clear_cookie(ADMIN_SESSION_COOKIE, state.config.security.cookie_secure);
    (
        [(header::SET_COOKIE, cookie)],
        success(json!({ "loggedOut": true })),
    )
}

/// The authenticated operator.
///
/// GET /api/admin/auth/me
pub async fn me(session: AdminSession) -> impl IntoResponse {
    success(json!({ "username": session.username }))
}

/// Paginated user listing with optional search.
///
/// GET /api/admin/users?page=...&limit=...&search=...
pub async fn list_users(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AdminRepository::new(state.pool.clone());
    let (users, total) = repo
        .list_users(params.offset(), params.limit(), params.search())
        .await?;

    let views = users
        .into_iter()
        .map(|u| AdminUserView {
            id: u.id,
            email: u.email,
            name: u.name,
            created_at: u.created_at,
            group_count: u.group_count,
            game_count: u.game_count,
        })
        .collect();

    Ok(success(AdminUserList {
        users: views,
        page_info: PageInfo::new(&params, total),
    }))
}

/// Delete a user account. Their game history stays, anonymized to guest
/// entries under their name.
///
/// DELETE /api/admin/users/:user_id
pub async fn delete_user(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AdminRepository::new(state.pool.clone());
    if !repo.delete_user(user_id).await? {
        return Err(ApiError::NotFound("User not found".into()));
    }

    info!(user_id = %user_id, "User deleted by admin");

    Ok(success(json!({ "deleted": true })))
}

/// Paginated group listing with optional search.
///
/// GET /api/admin/groups?page=...&limit=...&search=...
pub async fn list_groups(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AdminRepository::new(state.pool.clone());
    let (groups, total) = repo
        .list_groups(params.offset(), params.limit(), params.search())
        .await?;

    let views = groups
        .into_iter()
        .map(|g| AdminGroupView {
            id: g.id,
            name: g.name,
            created_at: g.created_at,
            member_count: g.member_count,
            game_count: g.game_count,
        })
        .collect();

    Ok(success(AdminGroupList {
        groups: views,
        page_info: PageInfo::new(&params, total),
    }))
}

/// Delete a group and everything in it.
///
/// DELETE /api/admin/groups/:group_id
pub async fn delete_group(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(group_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AdminRepository::new(state.pool.clone());
    if !repo.delete_group(group_id).await? {
        return Err(ApiError::NotFound("Group not found".into()));
    }

    info!(group_id = %group_id, "Group deleted by admin");

    Ok(success(json!({ "deleted": true })))
}

/// Platform totals and recent signups.
///
/// GET /api/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AdminRepository::new(state.pool.clone());
    let stats = repo.stats().await?;

    Ok(success(AdminStatsView {
        total_users: stats.total_users,
        total_groups: stats.total_groups,
        total_games: stats.total_games,
        recent_signups: stats
            .recent_signups
            .into_iter()
            .map(|u| AdminSignupView {
                id: u.id,
                email: u.email,
                name: u.name,
                created_at: u.created_at,
            })
            .collect(),
    }))
}
