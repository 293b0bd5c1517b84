//! Blind preset routes. Presets are personal: each belongs to the user who
//! created it and feeds the client-side tournament timer.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::blind_preset::validate_levels;
use domain::models::{BlindPreset, CreatePresetRequest};
use persistence::repositories::BlindPresetRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserSession;
use crate::response::success;

/// The caller's presets, newest first.
///
/// GET /api/blind-presets
pub async fn list_presets(
    State(state): State<AppState>,
    session: UserSession,
) -> Result<impl IntoResponse, ApiError> {
    let repo = BlindPresetRepository::new(state.pool.clone());
    let entities = repo.list_for_user(session.user_id).await?;

    let presets: Vec<BlindPreset> = entities
        .into_iter()
        .map(BlindPreset::try_from)
        .collect::<Result<_, _>>()
        .map_err(|e| ApiError::Internal(format!("Corrupt blind preset levels: {}", e)))?;

    Ok(success(presets))
}

/// Create a preset from a validated level schedule.
///
/// POST /api/blind-presets
pub async fn create_preset(
    State(state): State<AppState>,
    session: UserSession,
    Json(request): Json<CreatePresetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;
    validate_levels(&request.levels).map_err(|e| ApiError::Validation(e.to_string()))?;

    let levels = serde_json::to_value(&request.levels)
        .map_err(|e| ApiError::Internal(format!("Failed to encode levels: {}", e)))?;

    let repo = BlindPresetRepository::new(state.pool.clone());
    let entity = repo
        .create_preset(session.user_id, request.name.trim(), &levels)
        .await?;

    info!(preset_id = %entity.id, user_id = %session.user_id, "Blind preset created");

    let preset = BlindPreset::try_from(entity)
        .map_err(|e| ApiError::Internal(format!("Corrupt blind preset levels: {}", e)))?;

    Ok((StatusCode::CREATED, success(preset)))
}

/// Delete one of the caller's presets.
///
/// DELETE /api/blind-presets/:preset_id
pub async fn delete_preset(
    State(state): State<AppState>,
    session: UserSession,
    Path(preset_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = BlindPresetRepository::new(state.pool.clone());
    let preset = repo
        .find_by_id(preset_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Preset not found".into()))?;

    if preset.user_id != session.user_id {
        return Err(ApiError::Forbidden("You do not own this preset".into()));
    }

    repo.delete_preset(preset_id).await?;

    info!(preset_id = %preset_id, user_id = %session.user_id, "Blind preset deleted");

    Ok(success(json!({ "deleted": true })))
}
