//! Game and participant entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::game::{Game, GameType};
use domain::services::aggregation::{ParticipationRow, UserParticipationRow};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for game_type that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "game_type", rename_all = "lowercase")]
pub enum GameTypeDb {
    Cash,
    Tournament,
}

impl From<GameTypeDb> for GameType {
    fn from(db_type: GameTypeDb) -> Self {
        match db_type {
            GameTypeDb::Cash => GameType::Cash,
            GameTypeDb::Tournament => GameType::Tournament,
        }
    }
}

impl From<GameType> for GameTypeDb {
    fn from(game_type: GameType) -> Self {
        match game_type {
            GameType::Cash => GameTypeDb::Cash,
            GameType::Tournament => GameTypeDb::Tournament,
        }
    }
}

/// Database row mapping for the games table.
#[derive(Debug, Clone, FromRow)]
pub struct GameEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub date: DateTime<Utc>,
    pub game_type: GameTypeDb,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GameEntity> for Game {
    fn from(entity: GameEntity) -> Self {
        Self {
            id: entity.id,
            group_id: entity.group_id,
            date: entity.date,
            game_type: entity.game_type.into(),
            notes: entity.notes,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the game_participants table, joined with the
/// member's name where one exists.
#[derive(Debug, Clone, FromRow)]
pub struct GameParticipantEntity {
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_id: Option<Uuid>,
    pub guest_name: Option<String>,
    pub spent: Decimal,
    pub won: Decimal,
    /// Member account name, or the guest name.
    pub display_name: String,
}

/// Participant row joined with its game, feeding group aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipationEntity {
    pub game_id: Uuid,
    pub game_date: DateTime<Utc>,
    pub game_type: GameTypeDb,
    pub user_id: Option<Uuid>,
    pub display_name: String,
    pub spent: Decimal,
    pub won: Decimal,
}

impl From<ParticipationEntity> for ParticipationRow {
    fn from(entity: ParticipationEntity) -> Self {
        Self {
            game_id: entity.game_id,
            game_date: entity.game_date,
            game_type: entity.game_type.into(),
            user_id: entity.user_id,
            display_name: entity.display_name,
            spent: entity.spent,
            won: entity.won,
        }
    }
}

/// One of a user's own participant rows, joined with game and group,
/// feeding user aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct UserParticipationEntity {
    pub game_id: Uuid,
    pub group_id: Uuid,
    pub group_name: String,
    pub game_date: DateTime<Utc>,
    pub game_type: GameTypeDb,
    pub spent: Decimal,
    pub won: Decimal,
}

impl From<UserParticipationEntity> for UserParticipationRow {
    fn from(entity: UserParticipationEntity) -> Self {
        Self {
            game_id: entity.game_id,
            group_id: entity.group_id,
            group_name: entity.group_name,
            game_date: entity.game_date,
            game_type: entity.game_type.into(),
            spent: entity.spent,
            won: entity.won,
        }
    }
}
