//! Invite repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{GroupInviteEntity, InviteWithContextEntity};
use crate::metrics::QueryTimer;

/// Repository for invite lifecycle database operations.
#[derive(Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending invite. Exactly one of `invitee_id`/`invitee_email`
    /// must be set; the table CHECK enforces the same.
    pub async fn create_invite(
        &self,
        group_id: Uuid,
        inviter_id: Uuid,
        invitee_id: Option<Uuid>,
        invitee_email: Option<&str>,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<GroupInviteEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invite");
        let result = sqlx::query_as::<_, GroupInviteEntity>(
            r#"
            INSERT INTO group_invites (group_id, inviter_id, invitee_id, invitee_email, token, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, group_id, inviter_id, invitee_id, invitee_email, token,
                      status, expires_at, seen_at, created_at
            "#,
        )
        .bind(group_id)
        .bind(inviter_id)
        .bind(invitee_id)
        .bind(invitee_email)
        .bind(token)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GroupInviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_by_id");
        let result = sqlx::query_as::<_, GroupInviteEntity>(
            r#"
            SELECT id, group_id, inviter_id, invitee_id, invitee_email, token,
                   status, expires_at, seen_at, created_at
            FROM group_invites
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<GroupInviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_by_token");
        let result = sqlx::query_as::<_, GroupInviteEntity>(
            r#"
            SELECT id, group_id, inviter_id, invitee_id, invitee_email, token,
                   status, expires_at, seen_at, created_at
            FROM group_invites
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Flip a pending invite past its expiry to expired. Conditional so a
    /// concurrent accept/decline is never overwritten; returns whether this
    /// call did the flip.
    pub async fn expire_if_due(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("expire_invite_if_due");
        let result = sqlx::query(
            r#"
            UPDATE group_invites
            SET status = 'expired'
            WHERE id = $1 AND status = 'pending' AND expires_at < $2
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Bulk form of [`Self::expire_if_due`] for a group's invite list.
    pub async fn expire_overdue_for_group(
        &self,
        group_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("expire_overdue_group_invites");
        let result = sqlx::query(
            r#"
            UPDATE group_invites
            SET status = 'expired'
            WHERE group_id = $1 AND status = 'pending' AND expires_at < $2
            "#,
        )
        .bind(group_id)
        .bind(now)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Bulk form of [`Self::expire_if_due`] for a user's inbox.
    pub async fn expire_overdue_for_user(
        &self,
        user_id: Uuid,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("expire_overdue_user_invites");
        let result = sqlx::query(
            r#"
            UPDATE group_invites
            SET status = 'expired'
            WHERE (invitee_id = $1 OR invitee_email = LOWER($2))
              AND status = 'pending' AND expires_at < $3
            "#,
        )
        .bind(user_id)
        .bind(email)
        .bind(now)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Whether the group already has a live pending invite for this target.
    pub async fn pending_exists_for_target(
        &self,
        group_id: Uuid,
        invitee_id: Option<Uuid>,
        invitee_email: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("pending_invite_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM group_invites
                WHERE group_id = $1
                  AND status = 'pending'
                  AND expires_at >= $4
                  AND (($2::uuid IS NOT NULL AND invitee_id = $2)
                    OR ($3::text IS NOT NULL AND invitee_email = $3))
            )
            "#,
        )
        .bind(group_id)
        .bind(invitee_id)
        .bind(invitee_email)
        .bind(now)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Pending invites of a group, newest first, with inviter names.
    pub async fn list_group_pending(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<InviteWithContextEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_group_pending_invites");
        let result = sqlx::query_as::<_, InviteWithContextEntity>(
            r#"
            SELECT i.id, i.group_id, i.inviter_id, i.invitee_id, i.invitee_email, i.token,
                   i.status, i.expires_at, i.seen_at, i.created_at,
                   g.name as group_name, u.name as inviter_name,
                   (SELECT COUNT(*) FROM group_memberships WHERE group_id = i.group_id) as member_count
            FROM group_invites i
            JOIN groups g ON i.group_id = g.id
            JOIN users u ON i.inviter_id = u.id
            WHERE i.group_id = $1 AND i.status = 'pending'
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Pending invites addressed to this user, by id or by their email.
    pub async fn list_user_pending(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<Vec<InviteWithContextEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_user_pending_invites");
        let result = sqlx::query_as::<_, InviteWithContextEntity>(
            r#"
            SELECT i.id, i.group_id, i.inviter_id, i.invitee_id, i.invitee_email, i.token,
                   i.status, i.expires_at, i.seen_at, i.created_at,
                   g.name as group_name, u.name as inviter_name,
                   (SELECT COUNT(*) FROM group_memberships WHERE group_id = i.group_id) as member_count
            FROM group_invites i
            JOIN groups g ON i.group_id = g.id
            JOIN users u ON i.inviter_id = u.id
            WHERE (i.invitee_id = $1 OR i.invitee_email = LOWER($2))
              AND i.status = 'pending'
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(email)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Full invite history for this user, newest first.
    pub async fn list_user_history(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<Vec<InviteWithContextEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_user_invite_history");
        let result = sqlx::query_as::<_, InviteWithContextEntity>(
            r#"
            SELECT i.id, i.group_id, i.inviter_id, i.invitee_id, i.invitee_email, i.token,
                   i.status, i.expires_at, i.seen_at, i.created_at,
                   g.name as group_name, u.name as inviter_name,
                   (SELECT COUNT(*) FROM group_memberships WHERE group_id = i.group_id) as member_count
            FROM group_invites i
            JOIN groups g ON i.group_id = g.id
            JOIN users u ON i.inviter_id = u.id
            WHERE i.invitee_id = $1 OR i.invitee_email = LOWER($2)
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(email)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Invite by token with group/inviter context, for the unauthenticated
    /// preview.
    pub async fn find_by_token_with_context(
        &self,
        token: &str,
    ) -> Result<Option<InviteWithContextEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_by_token_with_context");
        let result = sqlx::query_as::<_, InviteWithContextEntity>(
            r#"
            SELECT i.id, i.group_id, i.inviter_id, i.invitee_id, i.invitee_email, i.token,
                   i.status, i.expires_at, i.seen_at, i.created_at,
                   g.name as group_name, u.name as inviter_name,
                   (SELECT COUNT(*) FROM group_memberships WHERE group_id = i.group_id) as member_count
            FROM group_invites i
            JOIN groups g ON i.group_id = g.id
            JOIN users u ON i.inviter_id = u.id
            WHERE i.token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// First time the addressee opened the invite.
    pub async fn mark_seen(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("mark_invite_seen");
        let result = sqlx::query(
            "UPDATE group_invites SET seen_at = $2 WHERE id = $1 AND seen_at IS NULL",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Revoke a pending invite. Responded invites stay for history.
    pub async fn delete_pending(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_pending_invite");
        let result = sqlx::query("DELETE FROM group_invites WHERE id = $1 AND status = 'pending'")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Accept: flip the pending invite and insert the membership in one
    /// transaction. The conditional UPDATE loses to any concurrent
    /// response; an existing membership makes the insert fail and the whole
    /// transaction roll back.
    pub async fn accept_invite(
        &self,
        invite_id: Uuid,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("accept_invite");

        let mut tx = self.pool.begin().await?;

        let flipped = sqlx::query(
            r#"
            UPDATE group_invites
            SET status = 'accepted'
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(invite_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        if !flipped {
            tx.rollback().await?;
            timer.record();
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO group_memberships (group_id, user_id, role)
            VALUES ($1, $2, 'member')
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(true)
    }

    /// Decline: flip the pending invite. Returns false if it was no longer
    /// pending.
    pub async fn decline_invite(&self, invite_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("decline_invite");
        let result = sqlx::query(
            r#"
            UPDATE group_invites
            SET status = 'declined'
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(invite_id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
