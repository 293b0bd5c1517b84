//! Dashboard read models.
//!
//! These are pure output shapes; the numbers are produced by
//! `services::aggregation` from participant rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::game::GameType;

/// One player's line in a group standings table.
///
/// `user_id` is set for member players; guests carry only a name and merge
/// by lowercased name across games.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStanding {
    pub user_id: Option<Uuid>,
    pub name: String,
    pub is_guest: bool,
    pub games_played: u32,
    pub total_spent: Decimal,
    pub total_won: Decimal,
    pub net: Decimal,
}

/// Scalar totals across a group's games.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub total_games: u32,
    pub cash_games: u32,
    pub tournament_games: u32,
    pub total_spent: Decimal,
    pub total_won: Decimal,
    pub net: Decimal,
}

/// A compact view of one game for the recent-games list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDigest {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub game_type: GameType,
    pub player_count: u32,
    pub total_pot: Decimal,
}

/// Group-scoped dashboard payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDashboard {
    pub summary: GroupSummary,
    pub standings: Vec<PlayerStanding>,
    pub recent_games: Vec<GameDigest>,
}

/// A user's overall totals across every group they play in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub total_games: u32,
    pub cash_games: u32,
    pub tournament_games: u32,
    pub total_spent: Decimal,
    pub total_won: Decimal,
    pub net: Decimal,
}

/// Per-group slice of a user's results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBreakdownEntry {
    pub group_id: Uuid,
    pub group_name: String,
    pub games_played: u32,
    pub total_spent: Decimal,
    pub total_won: Decimal,
    pub net: Decimal,
}

/// One of the user's own recent games, with their personal result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGameDigest {
    pub game_id: Uuid,
    pub group_id: Uuid,
    pub group_name: String,
    pub date: DateTime<Utc>,
    pub game_type: GameType,
    pub spent: Decimal,
    pub won: Decimal,
    pub net: Decimal,
}

/// User-scoped dashboard payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboard {
    pub summary: UserSummary,
    pub breakdown: Vec<GroupBreakdownEntry>,
    pub recent_games: Vec<UserGameDigest>,
}
