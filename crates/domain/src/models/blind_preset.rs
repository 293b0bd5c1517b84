//! Blind structure presets for the tournament timer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// One level of a blind structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlindLevel {
    pub small_blind: u32,
    pub big_blind: u32,
    pub ante: u32,
    pub duration_minutes: u32,
}

impl BlindLevel {
    /// Level duration in seconds.
    pub fn duration_secs(&self) -> u32 {
        self.duration_minutes * 60
    }
}

/// Reasons a level list is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlindLevelError {
    #[error("A preset needs at least one level")]
    Empty,

    #[error("Level {0}: duration must be at least 1 minute")]
    ZeroDuration(usize),
}

/// Validates a level list: non-empty, every duration at least one minute.
/// Blind and ante amounts are unsigned, so non-negativity holds by type.
pub fn validate_levels(levels: &[BlindLevel]) -> Result<(), BlindLevelError> {
    if levels.is_empty() {
        return Err(BlindLevelError::Empty);
    }
    for (index, level) in levels.iter().enumerate() {
        if level.duration_minutes < 1 {
            return Err(BlindLevelError::ZeroDuration(index));
        }
    }
    Ok(())
}

/// A named blind structure saved by a user.
///
/// Only the level list is persisted; a running timer is never saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlindPreset {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub levels: Vec<BlindLevel>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for saving a preset.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePresetRequest {
    #[validate(length(min = 1, max = 100, message = "Preset name must be 1-100 characters"))]
    pub name: String,

    pub levels: Vec<BlindLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(sb: u32, bb: u32, ante: u32, minutes: u32) -> BlindLevel {
        BlindLevel {
            small_blind: sb,
            big_blind: bb,
            ante,
            duration_minutes: minutes,
        }
    }

    #[test]
    fn test_empty_levels_rejected() {
        assert_eq!(validate_levels(&[]), Err(BlindLevelError::Empty));
    }

    #[test]
    fn test_zero_duration_rejected_with_index() {
        let levels = [level(25, 50, 0, 15), level(50, 100, 0, 0)];
        assert_eq!(
            validate_levels(&levels),
            Err(BlindLevelError::ZeroDuration(1))
        );
    }

    #[test]
    fn test_valid_levels_pass() {
        let levels = [level(25, 50, 0, 15), level(50, 100, 25, 20)];
        assert!(validate_levels(&levels).is_ok());
    }

    #[test]
    fn test_duration_secs() {
        assert_eq!(level(25, 50, 0, 15).duration_secs(), 900);
    }

    #[test]
    fn test_level_json_shape() {
        let json = serde_json::to_value(level(100, 200, 25, 15)).unwrap();
        assert_eq!(json["smallBlind"], 100);
        assert_eq!(json["bigBlind"], 200);
        assert_eq!(json["ante"], 25);
        assert_eq!(json["durationMinutes"], 15);
    }
}
