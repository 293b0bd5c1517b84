//! Game ledger routes: recording, listing, replacing and deleting games.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::game::{validate_participants, GameFilter, GameType, UpsertGameRequest};
use persistence::entities::{GameEntity, GameParticipantEntity};
use persistence::repositories::{GameRepository, GroupRepository};
use shared::money;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserSession;
use crate::middleware::metrics::record_game_saved;
use crate::response::success;
use crate::services::authorization::{require_admin, require_membership};

/// One participant's line in a game, amounts formatted to two decimals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantView {
    pub user_id: Option<Uuid>,
    pub guest_name: Option<String>,
    pub display_name: String,
    pub spent: String,
    pub won: String,
    pub net: String,
}

impl From<GameParticipantEntity> for ParticipantView {
    fn from(entity: GameParticipantEntity) -> Self {
        let net = money::net(entity.won, entity.spent);
        Self {
            user_id: entity.user_id,
            guest_name: entity.guest_name,
            display_name: entity.display_name,
            spent: money::format_amount(entity.spent),
            won: money::format_amount(entity.won),
            net: money::format_signed(net),
        }
    }
}

/// A game with its participants, winners first.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub id: Uuid,
    pub group_id: Uuid,
    pub date: DateTime<Utc>,
    pub game_type: GameType,
    pub notes: Option<String>,
    pub total_pot: String,
    pub participants: Vec<ParticipantView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameView {
    fn new(game: GameEntity, participants: Vec<GameParticipantEntity>) -> Self {
        let total_pot = money::sum(participants.iter().map(|p| p.spent));
        Self {
            id: game.id,
            group_id: game.group_id,
            date: game.date,
            game_type: game.game_type.into(),
            notes: game.notes,
            total_pot: money::format_amount(total_pot),
            participants: participants.into_iter().map(ParticipantView::from).collect(),
            created_at: game.created_at,
            updated_at: game.updated_at,
        }
    }
}

/// Record a game. Any member of the group may record.
///
/// POST /api/groups/:group_id/games
pub async fn create_game(
    State(state): State<AppState>,
    session: UserSession,
    Path(group_id): Path<Uuid>,
    Json(request): Json<UpsertGameRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let groups = GroupRepository::new(state.pool.clone());
    require_membership(&groups, group_id, session.user_id).await?;

    let roster = groups.member_ids(group_id).await?.into_iter().collect();
    let participants = validate_participants(&request.participants, &roster)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let games = GameRepository::new(state.pool.clone());
    let game = games
        .create_game(
            group_id,
            request.date,
            request.game_type.into(),
            request.notes.as_deref(),
            &participants,
        )
        .await?;

    record_game_saved();
    info!(game_id = %game.id, group_id = %group_id, user_id = %session.user_id, "Game recorded");

    let rows = games.participants_for_games(&[game.id]).await?;
    Ok((StatusCode::CREATED, success(GameView::new(game, rows))))
}

/// List a group's games, newest first, with optional date and type filters.
///
/// GET /api/groups/:group_id/games?startDate=...&endDate=...&gameType=...
pub async fn list_games(
    State(state): State<AppState>,
    session: UserSession,
    Path(group_id): Path<Uuid>,
    Query(filter): Query<GameFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let groups = GroupRepository::new(state.pool.clone());
    require_membership(&groups, group_id, session.user_id).await?;

    let games = GameRepository::new(state.pool.clone());
    let entities = games
        .list_games(
            group_id,
            filter.start_date,
            filter.end_date,
            filter.game_type.map(Into::into),
        )
        .await?;

    let game_ids: Vec<Uuid> = entities.iter().map(|g| g.id).collect();
    let mut by_game: HashMap<Uuid, Vec<GameParticipantEntity>> = HashMap::new();
    for row in games.participants_for_games(&game_ids).await? {
        by_game.entry(row.game_id).or_default().push(row);
    }

    let views: Vec<GameView> = entities
        .into_iter()
        .map(|game| {
            let rows = by_game.remove(&game.id).unwrap_or_default();
            GameView::new(game, rows)
        })
        .collect();

    Ok(success(views))
}

/// One game with its participants.
///
/// GET /api/groups/:group_id/games/:game_id
pub async fn get_game(
    State(state): State<AppState>,
    session: UserSession,
    Path((group_id, game_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let groups = GroupRepository::new(state.pool.clone());
    require_membership(&groups, group_id, session.user_id).await?;

    let games = GameRepository::new(state.pool.clone());
    let game = find_in_group(&games, group_id, game_id).await?;

    let rows = games.participants_for_games(&[game.id]).await?;
    Ok(success(GameView::new(game, rows)))
}

/// Replace a game: its fields and its whole participant set.
///
/// PUT /api/groups/:group_id/games/:game_id
pub async fn update_game(
    State(state): State<AppState>,
    session: UserSession,
    Path((group_id, game_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpsertGameRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let groups = GroupRepository::new(state.pool.clone());
    require_membership(&groups, group_id, session.user_id).await?;

    let games = GameRepository::new(state.pool.clone());
    find_in_group(&games, group_id, game_id).await?;

    let roster = groups.member_ids(group_id).await?.into_iter().collect();
    let participants = validate_participants(&request.participants, &roster)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let game = games
        .update_game(
            game_id,
            request.date,
            request.game_type.into(),
            request.notes.as_deref(),
            &participants,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Game not found".into()))?;

    record_game_saved();
    info!(game_id = %game_id, group_id = %group_id, user_id = %session.user_id, "Game updated");

    let rows = games.participants_for_games(&[game.id]).await?;
    Ok(success(GameView::new(game, rows)))
}

/// Delete a game. Owner or admin only.
///
/// DELETE /api/groups/:group_id/games/:game_id
pub async fn delete_game(
    State(state): State<AppState>,
    session: UserSession,
    Path((group_id, game_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let groups = GroupRepository::new(state.pool.clone());
    require_admin(&groups, group_id, session.user_id).await?;

    let games = GameRepository::new(state.pool.clone());
    find_in_group(&games, group_id, game_id).await?;

    if !games.delete_game(game_id).await? {
        return Err(ApiError::NotFound("Game not found".into()));
    }

    info!(game_id = %game_id, group_id = %group_id, user_id = %session.user_id, "Game deleted");

    Ok(success(json!({ "deleted": true })))
}

/// A game id outside this group 404s the same as a missing one.
async fn find_in_group(
    games: &GameRepository,
    group_id: Uuid,
    game_id: Uuid,
) -> Result<GameEntity, ApiError> {
    games
        .find_by_id(game_id)
        .await?
        .filter(|g| g.group_id == group_id)
        .ok_or_else(|| ApiError::NotFound("Game not found".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use persistence::entities::GameTypeDb;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn participant(spent: &str, won: &str) -> GameParticipantEntity {
        GameParticipantEntity {
            id: Uuid::new_v4(),
            game_id: Uuid::new_v4(),
            user_id: Some(Uuid::new_v4()),
            guest_name: None,
            spent: Decimal::from_str(spent).unwrap(),
            won: Decimal::from_str(won).unwrap(),
            display_name: "Alice".to_string(),
        }
    }

    #[test]
    fn test_participant_view_formats_amounts() {
        let view = ParticipantView::from(participant("100", "150.5"));
        assert_eq!(view.spent, "100.00");
        assert_eq!(view.won, "150.50");
        assert_eq!(view.net, "+50.50");

        let view = ParticipantView::from(participant("100", "70"));
        assert_eq!(view.net, "-30.00");

        let view = ParticipantView::from(participant("25", "25"));
        assert_eq!(view.net, "0.00");
    }

    #[test]
    fn test_game_view_total_pot_sums_spends() {
        let game = GameEntity {
            id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            date: Utc::now(),
            game_type: GameTypeDb::Cash,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let view = GameView::new(
            game,
            vec![participant("100", "0"), participant("50.25", "150.25")],
        );
        assert_eq!(view.total_pot, "150.25");
        assert_eq!(view.participants.len(), 2);
    }

    #[test]
    fn test_game_view_serializes_camel_case() {
        let game = GameEntity {
            id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            date: Utc::now(),
            game_type: GameTypeDb::Tournament,
            notes: Some("final table".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(GameView::new(game, vec![])).unwrap();
        assert_eq!(json["gameType"], "TOURNAMENT");
        assert_eq!(json["totalPot"], "0.00");
        assert!(json["groupId"].is_string());
    }
}
