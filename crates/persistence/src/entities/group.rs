//! Group entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::group::GroupRole;
use domain::models::{Group, GroupMembership};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for group_role that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "group_role", rename_all = "lowercase")]
pub enum GroupRoleDb {
    Owner,
    Admin,
    Member,
}

impl From<GroupRoleDb> for GroupRole {
    fn from(db_role: GroupRoleDb) -> Self {
        match db_role {
            GroupRoleDb::Owner => GroupRole::Owner,
            GroupRoleDb::Admin => GroupRole::Admin,
            GroupRoleDb::Member => GroupRole::Member,
        }
    }
}

impl From<GroupRole> for GroupRoleDb {
    fn from(role: GroupRole) -> Self {
        match role {
            GroupRole::Owner => GroupRoleDb::Owner,
            GroupRole::Admin => GroupRoleDb::Admin,
            GroupRole::Member => GroupRoleDb::Member,
        }
    }
}

/// Database row mapping for the groups table.
#[derive(Debug, Clone, FromRow)]
pub struct GroupEntity {
    pub id: Uuid,
    pub name: String,
    pub public_join_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GroupEntity> for Group {
    fn from(entity: GroupEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            public_join_token: entity.public_join_token,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the group_memberships table.
#[derive(Debug, Clone, FromRow)]
pub struct GroupMembershipEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: GroupRoleDb,
    pub joined_at: DateTime<Utc>,
}

impl From<GroupMembershipEntity> for GroupMembership {
    fn from(entity: GroupMembershipEntity) -> Self {
        Self {
            id: entity.id,
            group_id: entity.group_id,
            user_id: entity.user_id,
            role: entity.role.into(),
            joined_at: entity.joined_at,
        }
    }
}

/// Group row extended with the caller's membership and activity counts,
/// for the my-groups listing.
#[derive(Debug, Clone, FromRow)]
pub struct GroupWithMembershipEntity {
    pub id: Uuid,
    pub name: String,
    pub public_join_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Membership fields
    pub membership_id: Uuid,
    pub role: GroupRoleDb,
    pub joined_at: DateTime<Utc>,
    // Aggregates
    pub member_count: i64,
    pub game_count: i64,
}

/// Membership row with user info for listing members.
#[derive(Debug, Clone, FromRow)]
pub struct MemberWithUserEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: GroupRoleDb,
    pub joined_at: DateTime<Utc>,
    // User fields
    pub name: String,
    pub email: String,
}

/// Group row with aggregates for the admin back-office listing.
#[derive(Debug, Clone, FromRow)]
pub struct AdminGroupEntity {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub member_count: i64,
    pub game_count: i64,
}
