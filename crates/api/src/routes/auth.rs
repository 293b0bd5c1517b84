//! User authentication routes: signup, signin, signout and session lookup.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::info;
use validator::Validate;

use domain::models::user::{SignInRequest, SignUpRequest, User};
use persistence::repositories::UserRepository;
use shared::password;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserSession;
use crate::response::success;
use crate::services::cookies::{build_clear_cookie, build_session_cookie, SESSION_COOKIE};

/// Create an account and start a session.
///
/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let email = request.email.trim().to_lowercase();
    let name = request.name.trim().to_string();

    let password_hash = password::hash_password(&request.password)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .create_user(&email, &name, &password_hash)
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => {
                ApiError::Conflict("An account with this email already exists".into())
            }
            other => other,
        })?;

    let token = state
        .user_keys
        .issue(&user.id.to_string())
        .map_err(|e| ApiError::Internal(format!("Failed to issue session: {}", e)))?;
    let cookie = build_session_cookie(
        SESSION_COOKIE,
        &token,
        state.config.auth.session_expiry_secs,
        state.config.security.cookie_secure,
    );

    info!(user_id = %user.id, "User signed up");

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        success(User::from(user)),
    ))
}

/// Authenticate and start a session.
///
/// POST /api/auth/signin
///
/// The failure message never distinguishes an unknown email from a wrong
/// password.
pub async fn signin(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".into()))?;

    let matches = password::verify_password(&request.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;
    if !matches {
        return Err(ApiError::Unauthorized("Invalid email or password".into()));
    }

    let token = state
        .user_keys
        .issue(&user.id.to_string())
        .map_err(|e| ApiError::Internal(format!("Failed to issue session: {}", e)))?;
    let cookie = build_session_cookie(
        SESSION_COOKIE,
        &token,
        state.config.auth.session_expiry_secs,
        state.config.security.cookie_secure,
    );

    info!(user_id = %user.id, "User signed in");

    Ok(([(header::SET_COOKIE, cookie)], success(User::from(user))))
}

/// End the session by clearing the cookie.
///
/// POST /api/auth/signout
pub async fn signout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = build_clear_cookie(SESSION_COOKIE, state.config.security.cookie_secure);
    (
        [(header::SET_COOKIE, cookie)],
        success(json!({ "signedOut": true })),
    )
}

/// The authenticated user's own account.
///
/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    session: UserSession,
) -> Result<impl IntoResponse, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .find_by_id(session.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".into()))?;

    Ok(success(User::from(user)))
}
