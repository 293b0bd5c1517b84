//! Game repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::ValidatedParticipant;
use domain::models::game::ParticipantIdentity;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::{GameEntity, GameParticipantEntity, GameTypeDb};
use crate::metrics::QueryTimer;

/// Repository for game and participant database operations.
#[derive(Clone)]
pub struct GameRepository {
    pool: PgPool,
}

impl GameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a game and its participant rows atomically.
    pub async fn create_game(
        &self,
        group_id: Uuid,
        date: DateTime<Utc>,
        game_type: GameTypeDb,
        notes: Option<&str>,
        participants: &[ValidatedParticipant],
    ) -> Result<GameEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_game");

        let mut tx = self.pool.begin().await?;

        let game = sqlx::query_as::<_, GameEntity>(
            r#"
            INSERT INTO games (group_id, date, game_type, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, group_id, date, game_type, notes, created_at, updated_at
            "#,
        )
        .bind(group_id)
        .bind(date)
        .bind(game_type)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;

        insert_participants(&mut tx, game.id, participants).await?;

        tx.commit().await?;
        timer.record();
        Ok(game)
    }

    /// Update a game and replace its participant set atomically.
    pub async fn update_game(
        &self,
        game_id: Uuid,
        date: DateTime<Utc>,
        game_type: GameTypeDb,
        notes: Option<&str>,
        participants: &[ValidatedParticipant],
    ) -> Result<Option<GameEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_game");

        let mut tx = self.pool.begin().await?;

        let game = sqlx::query_as::<_, GameEntity>(
            r#"
            UPDATE games
            SET date = $2, game_type = $3, notes = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, group_id, date, game_type, notes, created_at, updated_at
            "#,
        )
        .bind(game_id)
        .bind(date)
        .bind(game_type)
        .bind(notes)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(game) = game else {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        };

        sqlx::query("DELETE FROM game_participants WHERE game_id = $1")
            .bind(game_id)
            .execute(&mut *tx)
            .await?;

        insert_participants(&mut tx, game_id, participants).await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(game))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GameEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_game_by_id");
        let result = sqlx::query_as::<_, GameEntity>(
            r#"
            SELECT id, group_id, date, game_type, notes, created_at, updated_at
            FROM games
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Games of a group with optional date/type bounds, newest first.
    pub async fn list_games(
        &self,
        group_id: Uuid,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        game_type: Option<GameTypeDb>,
    ) -> Result<Vec<GameEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_games");
        let result = sqlx::query_as::<_, GameEntity>(
            r#"
            SELECT id, group_id, date, game_type, notes, created_at, updated_at
            FROM games
            WHERE group_id = $1
              AND ($2::timestamptz IS NULL OR date >= $2)
              AND ($3::timestamptz IS NULL OR date <= $3)
              AND ($4::game_type IS NULL OR game_type = $4)
            ORDER BY date DESC
            "#,
        )
        .bind(group_id)
        .bind(start_date)
        .bind(end_date)
        .bind(game_type)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Participant rows for a set of games, with member names resolved.
    pub async fn participants_for_games(
        &self,
        game_ids: &[Uuid],
    ) -> Result<Vec<GameParticipantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("participants_for_games");
        let result = sqlx::query_as::<_, GameParticipantEntity>(
            r#"
            SELECT gp.id, gp.game_id, gp.user_id, gp.guest_name, gp.spent, gp.won,
                   COALESCE(u.name, gp.guest_name) as display_name
            FROM game_participants gp
            LEFT JOIN users u ON gp.user_id = u.id
            WHERE gp.game_id = ANY($1)
            ORDER BY gp.won - gp.spent DESC
            "#,
        )
        .bind(game_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete_game(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_game");
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

async fn insert_participants(
    tx: &mut Transaction<'_, Postgres>,
    game_id: Uuid,
    participants: &[ValidatedParticipant],
) -> Result<(), sqlx::Error> {
    for participant in participants {
        let (user_id, guest_name) = match &participant.identity {
            ParticipantIdentity::Member(user_id) => (Some(*user_id), None),
            ParticipantIdentity::Guest(name) => (None, Some(name.as_str())),
        };
        sqlx::query(
            r#"
            INSERT INTO game_participants (game_id, user_id, guest_name, spent, won)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(game_id)
        .bind(user_id)
        .bind(guest_name)
        .bind(participant.spent)
        .bind(participant.won)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
