//! Admin back-office repository: paginated listings, deletions and stats.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{AdminGroupEntity, AdminUserEntity, UserEntity};
use crate::metrics::QueryTimer;

/// Platform-wide totals for the admin stats view.
#[derive(Debug, Clone)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_groups: i64,
    pub total_games: i64,
    pub recent_signups: Vec<UserEntity>,
}

/// Repository for admin back-office database operations.
#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Paginated user listing with optional name/email search and
    /// per-user aggregates. Returns the page and the unpaginated total.
    pub async fn list_users(
        &self,
        offset: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Result<(Vec<AdminUserEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("admin_list_users");
        let pattern = search.map(|s| format!("%{}%", s));

        let users = sqlx::query_as::<_, AdminUserEntity>(
            r#"
            SELECT u.id, u.email, u.name, u.created_at,
                   (SELECT COUNT(*) FROM group_memberships WHERE user_id = u.id) as group_count,
                   (SELECT COUNT(*) FROM game_participants WHERE user_id = u.id) as game_count
            FROM users u
            WHERE $3::text IS NULL OR u.name ILIKE $3 OR u.email ILIKE $3
            ORDER BY u.created_at DESC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .bind(pattern.as_deref())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users u
            WHERE $1::text IS NULL OR u.name ILIKE $1 OR u.email ILIKE $1
            "#,
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        timer.record();
        Ok((users, total))
    }

    /// Paginated group listing with optional name search and aggregates.
    pub async fn list_groups(
        &self,
        offset: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Result<(Vec<AdminGroupEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("admin_list_groups");
        let pattern = search.map(|s| format!("%{}%", s));

        let groups = sqlx::query_as::<_, AdminGroupEntity>(
            r#"
            SELECT g.id, g.name, g.created_at,
                   (SELECT COUNT(*) FROM group_memberships WHERE group_id = g.id) as member_count,
                   (SELECT COUNT(*) FROM games WHERE group_id = g.id) as game_count
            FROM groups g
            WHERE $3::text IS NULL OR g.name ILIKE $3
            ORDER BY g.created_at DESC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .bind(pattern.as_deref())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM groups g
            WHERE $1::text IS NULL OR g.name ILIKE $1
            "#,
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        timer.record();
        Ok((groups, total))
    }

    /// Delete a user. Memberships and invites cascade. Participant rows are
    /// first anonymized to guest rows under the user's name, so historic
    /// ledgers stay intact.
    pub async fn delete_user(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("admin_delete_user");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE game_participants gp
            SET guest_name = u.name
            FROM users u
            WHERE gp.user_id = u.id AND u.id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        tx.commit().await?;
        timer.record();
        Ok(deleted)
    }

    pub async fn delete_group(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("admin_delete_group");
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Platform totals plus the five most recent signups.
    pub async fn stats(&self) -> Result<AdminStats, sqlx::Error> {
        let timer = QueryTimer::new("admin_stats");

        let total_users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        let total_groups = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM groups")
            .fetch_one(&self.pool)
            .await?;
        let total_games = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM games")
            .fetch_one(&self.pool)
            .await?;

        let recent_signups = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        timer.record();
        Ok(AdminStats {
            total_users,
            total_groups,
            total_games,
            recent_signups,
        })
    }
}
