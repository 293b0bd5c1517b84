//! Blind preset entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::blind_preset::{BlindLevel, BlindPreset};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the blind_presets table. Levels are stored as a
/// JSONB array.
#[derive(Debug, Clone, FromRow)]
pub struct BlindPresetEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub levels: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<BlindPresetEntity> for BlindPreset {
    type Error = serde_json::Error;

    fn try_from(entity: BlindPresetEntity) -> Result<Self, Self::Error> {
        let levels: Vec<BlindLevel> = serde_json::from_value(entity.levels)?;
        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            name: entity.name,
            levels,
            created_at: entity.created_at,
        })
    }
}
