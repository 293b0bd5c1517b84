//! Invite entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::invite::{GroupInvite, InviteStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for invite_status that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invite_status", rename_all = "lowercase")]
pub enum InviteStatusDb {
    Pending,
    Accepted,
    Declined,
    Expired,
}

impl From<InviteStatusDb> for InviteStatus {
    fn from(db_status: InviteStatusDb) -> Self {
        match db_status {
            InviteStatusDb::Pending => InviteStatus::Pending,
            InviteStatusDb::Accepted => InviteStatus::Accepted,
            InviteStatusDb::Declined => InviteStatus::Declined,
            InviteStatusDb::Expired => InviteStatus::Expired,
        }
    }
}

impl From<InviteStatus> for InviteStatusDb {
    fn from(status: InviteStatus) -> Self {
        match status {
            InviteStatus::Pending => InviteStatusDb::Pending,
            InviteStatus::Accepted => InviteStatusDb::Accepted,
            InviteStatus::Declined => InviteStatusDb::Declined,
            InviteStatus::Expired => InviteStatusDb::Expired,
        }
    }
}

/// Database row mapping for the group_invites table.
#[derive(Debug, Clone, FromRow)]
pub struct GroupInviteEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub inviter_id: Uuid,
    pub invitee_id: Option<Uuid>,
    pub invitee_email: Option<String>,
    pub token: String,
    pub status: InviteStatusDb,
    pub expires_at: DateTime<Utc>,
    pub seen_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<GroupInviteEntity> for GroupInvite {
    fn from(entity: GroupInviteEntity) -> Self {
        Self {
            id: entity.id,
            group_id: entity.group_id,
            inviter_id: entity.inviter_id,
            invitee_id: entity.invitee_id,
            invitee_email: entity.invitee_email,
            token: entity.token,
            status: entity.status.into(),
            expires_at: entity.expires_at,
            seen_at: entity.seen_at,
            created_at: entity.created_at,
        }
    }
}

/// Invite row with group and inviter names, for inbox and preview views.
#[derive(Debug, Clone, FromRow)]
pub struct InviteWithContextEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub inviter_id: Uuid,
    pub invitee_id: Option<Uuid>,
    pub invitee_email: Option<String>,
    pub token: String,
    pub status: InviteStatusDb,
    pub expires_at: DateTime<Utc>,
    pub seen_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    // Context
    pub group_name: String,
    pub inviter_name: String,
    pub member_count: i64,
}
