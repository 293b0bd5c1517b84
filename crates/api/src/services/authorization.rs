//! Group authorization guards.
//!
//! Handlers call these before touching group-scoped resources. A missing
//! session is a 401 handled by the extractors; these guards only decide
//! between "not a member" and "member without the required role", both 403.

use persistence::repositories::GroupRepository;
use thiserror::Error;
use uuid::Uuid;

use domain::models::{GroupMembership, GroupRole};

use crate::error::ApiError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthzError {
    #[error("You are not a member of this group")]
    NotAMember,

    #[error("You do not have permission to perform this action")]
    InsufficientRole,
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        ApiError::Forbidden(err.to_string())
    }
}

/// The caller must belong to the group.
pub async fn require_membership(
    groups: &GroupRepository,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<GroupMembership, ApiError> {
    let membership = groups
        .find_membership(group_id, user_id)
        .await?
        .ok_or(AuthzError::NotAMember)?;
    Ok(membership.into())
}

/// The caller must be an admin or the owner of the group.
pub async fn require_admin(
    groups: &GroupRepository,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<GroupMembership, ApiError> {
    let membership = require_membership(groups, group_id, user_id).await?;
    if !membership.role.can_manage_members() {
        return Err(AuthzError::InsufficientRole.into());
    }
    Ok(membership)
}

/// The caller must be the owner of the group.
pub async fn require_owner(
    groups: &GroupRepository,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<GroupMembership, ApiError> {
    let membership = require_membership(groups, group_id, user_id).await?;
    if membership.role != GroupRole::Owner {
        return Err(AuthzError::InsufficientRole.into());
    }
    Ok(membership)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_authz_errors_map_to_forbidden() {
        for err in [AuthzError::NotAMember, AuthzError::InsufficientRole] {
            let api: ApiError = err.into();
            let response = api.into_response();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }
    }

    #[test]
    fn test_authz_error_messages_are_distinct() {
        assert_ne!(
            AuthzError::NotAMember.to_string(),
            AuthzError::InsufficientRole.to_string()
        );
    }
}
