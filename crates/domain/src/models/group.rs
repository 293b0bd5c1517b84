//! Group and membership domain models, including the role policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Role within a group.
///
/// Every authorization decision matches exhaustively on this enum, so adding
/// a role is a compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupRole {
    Owner,
    Admin,
    Member,
}

impl GroupRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupRole::Owner => "OWNER",
            GroupRole::Admin => "ADMIN",
            GroupRole::Member => "MEMBER",
        }
    }

    /// Returns true if this role can create and revoke invites.
    pub fn can_manage_members(&self) -> bool {
        matches!(self, GroupRole::Owner | GroupRole::Admin)
    }

    /// Returns true if this role can change other members' roles.
    pub fn can_change_roles(&self) -> bool {
        matches!(self, GroupRole::Owner)
    }

    /// Returns true if this role can delete the group.
    pub fn can_delete_group(&self) -> bool {
        matches!(self, GroupRole::Owner)
    }

    /// Member-removal policy.
    ///
    /// The owner may remove admins and members; an admin may remove members
    /// or leave; a member may only leave. Nobody removes the owner, the
    /// owner included.
    pub fn can_remove_member(&self, target: GroupRole, is_self: bool) -> bool {
        match (self, target) {
            (_, GroupRole::Owner) => false,
            (GroupRole::Owner, _) => true,
            (GroupRole::Admin, GroupRole::Member) => true,
            (GroupRole::Admin, GroupRole::Admin) => is_self,
            (GroupRole::Member, GroupRole::Member) => is_self,
            (GroupRole::Member, GroupRole::Admin) => false,
        }
    }
}

impl FromStr for GroupRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OWNER" => Ok(GroupRole::Owner),
            "ADMIN" => Ok(GroupRole::Admin),
            "MEMBER" => Ok(GroupRole::Member),
            _ => Err(format!("Invalid group role: {}", s)),
        }
    }
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A role that can be assigned through the role-change operation.
///
/// OWNER is deliberately unrepresentable here: the modeled operations never
/// create a second owner or reassign ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssignableRole {
    Admin,
    Member,
}

impl From<AssignableRole> for GroupRole {
    fn from(role: AssignableRole) -> Self {
        match role {
            AssignableRole::Admin => GroupRole::Admin,
            AssignableRole::Member => GroupRole::Member,
        }
    }
}

/// A poker group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    /// Active public join token, if link-based joining is enabled.
    pub public_join_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's membership in a group. Unique per (group, user).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembership {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: GroupRole,
    pub joined_at: DateTime<Utc>,
}

/// Request payload for creating a group.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    #[validate(length(min = 2, max = 100, message = "Group name must be 2-100 characters"))]
    pub name: String,
}

/// Request payload for renaming a group.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    #[validate(length(min = 2, max = 100, message = "Group name must be 2-100 characters"))]
    pub name: String,
}

/// Request payload for changing a member's role.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRoleRequest {
    pub role: AssignableRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [GroupRole::Owner, GroupRole::Admin, GroupRole::Member] {
            assert_eq!(GroupRole::from_str(role.as_str()).unwrap(), role);
        }
        assert!(GroupRole::from_str("viewer").is_err());
    }

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!(GroupRole::from_str("owner").unwrap(), GroupRole::Owner);
        assert_eq!(GroupRole::from_str("Admin").unwrap(), GroupRole::Admin);
    }

    #[test]
    fn test_manage_members_policy() {
        assert!(GroupRole::Owner.can_manage_members());
        assert!(GroupRole::Admin.can_manage_members());
        assert!(!GroupRole::Member.can_manage_members());
    }

    #[test]
    fn test_only_owner_changes_roles_or_deletes() {
        assert!(GroupRole::Owner.can_change_roles());
        assert!(!GroupRole::Admin.can_change_roles());
        assert!(!GroupRole::Member.can_change_roles());

        assert!(GroupRole::Owner.can_delete_group());
        assert!(!GroupRole::Admin.can_delete_group());
    }

    #[test]
    fn test_nobody_removes_the_owner() {
        for actor in [GroupRole::Owner, GroupRole::Admin, GroupRole::Member] {
            assert!(!actor.can_remove_member(GroupRole::Owner, false));
            // Not even the owner themself through this operation
            assert!(!actor.can_remove_member(GroupRole::Owner, true));
        }
    }

    #[test]
    fn test_owner_removes_admins_and_members() {
        assert!(GroupRole::Owner.can_remove_member(GroupRole::Admin, false));
        assert!(GroupRole::Owner.can_remove_member(GroupRole::Member, false));
    }

    #[test]
    fn test_admin_removes_members_and_self_only() {
        assert!(GroupRole::Admin.can_remove_member(GroupRole::Member, false));
        assert!(GroupRole::Admin.can_remove_member(GroupRole::Admin, true));
        assert!(!GroupRole::Admin.can_remove_member(GroupRole::Admin, false));
    }

    #[test]
    fn test_member_may_only_leave() {
        assert!(GroupRole::Member.can_remove_member(GroupRole::Member, true));
        assert!(!GroupRole::Member.can_remove_member(GroupRole::Member, false));
        assert!(!GroupRole::Member.can_remove_member(GroupRole::Admin, false));
    }

    #[test]
    fn test_assignable_role_never_owner() {
        assert_eq!(GroupRole::from(AssignableRole::Admin), GroupRole::Admin);
        assert_eq!(GroupRole::from(AssignableRole::Member), GroupRole::Member);
        assert!(serde_json::from_str::<AssignableRole>("\"OWNER\"").is_err());
    }

    #[test]
    fn test_role_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&GroupRole::Owner).unwrap(),
            "\"OWNER\""
        );
    }
}
