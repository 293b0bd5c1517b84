//! Group repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    GroupEntity, GroupMembershipEntity, GroupRoleDb, GroupWithMembershipEntity,
    MemberWithUserEntity,
};
use crate::metrics::QueryTimer;

/// Repository for group and membership database operations.
#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a group and its owner membership atomically.
    pub async fn create_group(&self, name: &str, owner_id: Uuid) -> Result<GroupEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_group");

        let mut tx = self.pool.begin().await?;

        let group = sqlx::query_as::<_, GroupEntity>(
            r#"
            INSERT INTO groups (name)
            VALUES ($1)
            RETURNING id, name, public_join_token, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO group_memberships (group_id, user_id, role)
            VALUES ($1, $2, 'owner')
            "#,
        )
        .bind(group.id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(group)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_by_id");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, public_join_token, created_at, updated_at
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All groups the user belongs to, with member/game counts and the
    /// user's own membership, newest first.
    pub async fn find_user_groups(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<GroupWithMembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_groups");
        let result = sqlx::query_as::<_, GroupWithMembershipEntity>(
            r#"
            SELECT
                g.id, g.name, g.public_join_token, g.created_at, g.updated_at,
                gm.id as membership_id, gm.role, gm.joined_at,
                (SELECT COUNT(*) FROM group_memberships WHERE group_id = g.id) as member_count,
                (SELECT COUNT(*) FROM games WHERE group_id = g.id) as game_count
            FROM groups g
            JOIN group_memberships gm ON g.id = gm.group_id
            WHERE gm.user_id = $1
            ORDER BY gm.joined_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update_name(&self, id: Uuid, name: &str) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_group_name");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            UPDATE groups
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, public_join_token, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a group. Memberships, invites, games and participants go with
    /// it via ON DELETE CASCADE.
    pub async fn delete_group(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_group");
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    pub async fn find_membership(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupMembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_membership");
        let result = sqlx::query_as::<_, GroupMembershipEntity>(
            r#"
            SELECT id, group_id, user_id, role, joined_at
            FROM group_memberships
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Members of a group with their account names, owner first, then by
    /// join date.
    pub async fn list_members(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<MemberWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_members");
        let result = sqlx::query_as::<_, MemberWithUserEntity>(
            r#"
            SELECT gm.id, gm.group_id, gm.user_id, gm.role, gm.joined_at,
                   u.name, u.email
            FROM group_memberships gm
            JOIN users u ON gm.user_id = u.id
            WHERE gm.group_id = $1
            ORDER BY (gm.role = 'owner') DESC, gm.joined_at
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// User ids of all current members, for participant roster checks.
    pub async fn member_ids(&self, group_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("member_ids");
        let result = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM group_memberships WHERE group_id = $1",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn member_count(&self, group_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("member_count");
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM group_memberships WHERE group_id = $1",
        )
        .bind(group_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn game_count(&self, group_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("game_count");
        let result =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM games WHERE group_id = $1")
                .bind(group_id)
                .fetch_one(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Add a member. A unique violation on (group_id, user_id) means the
    /// user is already a member; callers map that themselves.
    pub async fn add_member(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        role: GroupRoleDb,
    ) -> Result<GroupMembershipEntity, sqlx::Error> {
        let timer = QueryTimer::new("add_member");
        let result = sqlx::query_as::<_, GroupMembershipEntity>(
            r#"
            INSERT INTO group_memberships (group_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING id, group_id, user_id, role, joined_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Change a member's role. Never touches the owner row.
    pub async fn update_member_role(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        role: GroupRoleDb,
    ) -> Result<Option<GroupMembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_member_role");
        let result = sqlx::query_as::<_, GroupMembershipEntity>(
            r#"
            UPDATE group_memberships
            SET role = $3
            WHERE group_id = $1 AND user_id = $2 AND role != 'owner'
            RETURNING id, group_id, user_id, role, joined_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Remove a member. The owner row is never deletable through this path.
    pub async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("remove_member");
        let result = sqlx::query(
            r#"
            DELETE FROM group_memberships
            WHERE group_id = $1 AND user_id = $2 AND role != 'owner'
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Set or clear the public join token.
    pub async fn set_public_join_token(
        &self,
        group_id: Uuid,
        token: Option<&str>,
    ) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_public_join_token");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            UPDATE groups
            SET public_join_token = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, public_join_token, created_at, updated_at
            "#,
        )
        .bind(group_id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_public_token(
        &self,
        token: &str,
    ) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_by_public_token");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, public_join_token, created_at, updated_at
            FROM groups
            WHERE public_join_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
