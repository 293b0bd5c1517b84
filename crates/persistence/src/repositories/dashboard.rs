//! Dashboard repository: participant rows feeding the pure aggregation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ParticipationEntity, UserParticipationEntity};
use crate::metrics::QueryTimer;

/// Repository for dashboard source queries.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every participant row of a group's games within the optional date
    /// bounds. Member names come from the users table; guests keep the name
    /// as entered.
    pub async fn group_participation(
        &self,
        group_id: Uuid,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Vec<ParticipationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("group_participation");
        let result = sqlx::query_as::<_, ParticipationEntity>(
            r#"
            SELECT g.id as game_id, g.date as game_date, g.game_type,
                   gp.user_id, COALESCE(u.name, gp.guest_name) as display_name,
                   gp.spent, gp.won
            FROM game_participants gp
            JOIN games g ON gp.game_id = g.id
            LEFT JOIN users u ON gp.user_id = u.id
            WHERE g.group_id = $1
              AND ($2::timestamptz IS NULL OR g.date >= $2)
              AND ($3::timestamptz IS NULL OR g.date <= $3)
            "#,
        )
        .bind(group_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The user's own participant rows across the groups they belong to,
    /// within the optional bounds. Rows from groups the user has since left
    /// are excluded by the membership join.
    pub async fn user_participation(
        &self,
        user_id: Uuid,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        group_id: Option<Uuid>,
    ) -> Result<Vec<UserParticipationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("user_participation");
        let result = sqlx::query_as::<_, UserParticipationEntity>(
            r#"
            SELECT g.id as game_id, gr.id as group_id, gr.name as group_name,
                   g.date as game_date, g.game_type, gp.spent, gp.won
            FROM game_participants gp
            JOIN games g ON gp.game_id = g.id
            JOIN groups gr ON g.group_id = gr.id
            JOIN group_memberships gm ON gm.group_id = gr.id AND gm.user_id = $1
            WHERE gp.user_id = $1
              AND ($2::timestamptz IS NULL OR g.date >= $2)
              AND ($3::timestamptz IS NULL OR g.date <= $3)
              AND ($4::uuid IS NULL OR gr.id = $4)
            "#,
        )
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .bind(group_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
