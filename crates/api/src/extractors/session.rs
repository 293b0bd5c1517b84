//! Session extractors.
//!
//! Handlers declare authentication by taking `UserSession` or `AdminSession`
//! as an argument. Extraction reads the realm's httpOnly cookie, validates
//! the signed token and rejects with 401 on any failure. An admin token
//! never satisfies `UserSession` and vice versa; the realm claim is checked
//! during validation.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use shared::session::subject_user_id;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::cookies::{extract_cookie, ADMIN_SESSION_COOKIE, SESSION_COOKIE};

/// An authenticated user session.
#[derive(Debug, Clone)]
pub struct UserSession {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for UserSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_cookie(&parts.headers, SESSION_COOKIE)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        let claims = state
            .user_keys
            .validate(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

        let user_id = subject_user_id(&claims)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

        Ok(UserSession { user_id })
    }
}

/// An authenticated back-office admin session.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub username: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_cookie(&parts.headers, ADMIN_SESSION_COOKIE)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        let claims = state
            .admin_keys
            .validate(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

        Ok(AdminSession {
            username: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue, Request};
    use shared::session::{SessionKeys, TokenRealm};
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;

    use crate::config::Config;

    fn test_state() -> AppState {
        let config = Config::load_for_test(&[]).unwrap();
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        AppState {
            pool,
            user_keys: Arc::new(SessionKeys::new(
                TokenRealm::User,
                &config.auth.session_secret,
                config.auth.session_expiry_secs,
            )),
            admin_keys: Arc::new(SessionKeys::new(
                TokenRealm::Admin,
                &config.auth.admin_session_secret,
                config.auth.admin_session_expiry_secs,
            )),
            config: Arc::new(config),
        }
    }

    fn parts_with_cookie(cookie: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/api/groups");
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, HeaderValue::from_str(&c).unwrap());
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn test_user_session_valid_cookie() {
        let state = test_state();
        let user_id = Uuid::new_v4();
        let token = state.user_keys.issue(&user_id.to_string()).unwrap();

        let mut parts = parts_with_cookie(Some(format!("{}={}", SESSION_COOKIE, token)));
        let session = UserSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(session.user_id, user_id);
    }

    #[tokio::test]
    async fn test_user_session_missing_cookie() {
        let state = test_state();
        let mut parts = parts_with_cookie(None);
        let result = UserSession::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_user_session_garbage_token() {
        let state = test_state();
        let mut parts =
            parts_with_cookie(Some(format!("{}=not-a-real-token", SESSION_COOKIE)));
        let result = UserSession::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_admin_token_rejected_for_user_realm() {
        let state = test_state();
        let token = state.admin_keys.issue("admin").unwrap();

        let mut parts = parts_with_cookie(Some(format!("{}={}", SESSION_COOKIE, token)));
        let result = UserSession::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_admin_session_valid_cookie() {
        let state = test_state();
        let token = state.admin_keys.issue("admin").unwrap();

        let mut parts = parts_with_cookie(Some(format!("{}={}", ADMIN_SESSION_COOKIE, token)));
        let session = AdminSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(session.username, "admin");
    }

    #[tokio::test]
    async fn test_user_token_rejected_for_admin_realm() {
        let state = test_state();
        let user_id = Uuid::new_v4();
        let token = state.user_keys.issue(&user_id.to_string()).unwrap();

        let mut parts =
            parts_with_cookie(Some(format!("{}={}", ADMIN_SESSION_COOKIE, token)));
        let result = AdminSession::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }
}
