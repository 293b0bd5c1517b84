//! Game and participant domain models, with participant-set validation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use shared::money;

/// Type of poker game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameType {
    Cash,
    Tournament,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Cash => "CASH",
            GameType::Tournament => "TOURNAMENT",
        }
    }
}

impl FromStr for GameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CASH" => Ok(GameType::Cash),
            "TOURNAMENT" => Ok(GameType::Tournament),
            _ => Err(format!("Invalid game type: {}", s)),
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded game session belonging to one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: Uuid,
    pub group_id: Uuid,
    pub date: DateTime<Utc>,
    pub game_type: GameType,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Who a participant row refers to: a group member or a named guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantIdentity {
    Member(Uuid),
    Guest(String),
}

/// Raw participant data as submitted by the client.
///
/// Amounts arrive as strings and are parsed exactly; exactly one of
/// `user_id` / `guest_name` must be set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInput {
    pub user_id: Option<Uuid>,
    pub guest_name: Option<String>,
    pub spent: String,
    pub won: String,
}

/// A participant that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedParticipant {
    pub identity: ParticipantIdentity,
    pub spent: Decimal,
    pub won: Decimal,
}

/// Reasons a submitted participant set is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParticipantError {
    #[error("A game must have at least 2 participants")]
    TooFew,

    #[error("Participant must be either a member or a guest, not both")]
    AmbiguousIdentity,

    #[error("Participant must name a member or a guest")]
    MissingIdentity,

    #[error("Guest name must be at most 100 characters")]
    GuestNameTooLong,

    #[error("Duplicate member participants are not allowed")]
    DuplicateMember,

    #[error("All member participants must be members of the group")]
    NotAGroupMember,

    #[error("Invalid amount for '{field}': {source}")]
    BadAmount {
        field: &'static str,
        source: money::MoneyError,
    },
}

/// Validates a submitted participant set against the group's member roster.
///
/// Enforces: at least two participants, exactly one identity per row, no
/// duplicate member rows, every member participant currently in the group
/// (guests are exempt), and non-negative two-decimal amounts.
pub fn validate_participants(
    inputs: &[ParticipantInput],
    group_member_ids: &HashSet<Uuid>,
) -> Result<Vec<ValidatedParticipant>, ParticipantError> {
    if inputs.len() < 2 {
        return Err(ParticipantError::TooFew);
    }

    let mut seen_members = HashSet::new();
    let mut validated = Vec::with_capacity(inputs.len());

    for input in inputs {
        let guest = input
            .guest_name
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty());

        let identity = match (input.user_id, guest) {
            (Some(_), Some(_)) => return Err(ParticipantError::AmbiguousIdentity),
            (None, None) => return Err(ParticipantError::MissingIdentity),
            (Some(user_id), None) => {
                if !group_member_ids.contains(&user_id) {
                    return Err(ParticipantError::NotAGroupMember);
                }
                if !seen_members.insert(user_id) {
                    return Err(ParticipantError::DuplicateMember);
                }
                ParticipantIdentity::Member(user_id)
            }
            (None, Some(name)) => {
                if name.len() > 100 {
                    return Err(ParticipantError::GuestNameTooLong);
                }
                ParticipantIdentity::Guest(name.to_string())
            }
        };

        let spent = money::parse_amount(&input.spent)
            .map_err(|source| ParticipantError::BadAmount { field: "spent", source })?;
        let won = money::parse_amount(&input.won)
            .map_err(|source| ParticipantError::BadAmount { field: "won", source })?;

        validated.push(ValidatedParticipant {
            identity,
            spent,
            won,
        });
    }

    Ok(validated)
}

/// Request payload for creating or replacing a game.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertGameRequest {
    pub date: DateTime<Utc>,
    pub game_type: GameType,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,

    pub participants: Vec<ParticipantInput>,
}

/// Query filters for listing games.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameFilter {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub game_type: Option<GameType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(user_id: Uuid, spent: &str, won: &str) -> ParticipantInput {
        ParticipantInput {
            user_id: Some(user_id),
            guest_name: None,
            spent: spent.to_string(),
            won: won.to_string(),
        }
    }

    fn guest(name: &str, spent: &str, won: &str) -> ParticipantInput {
        ParticipantInput {
            user_id: None,
            guest_name: Some(name.to_string()),
            spent: spent.to_string(),
            won: won.to_string(),
        }
    }

    fn roster(ids: &[Uuid]) -> HashSet<Uuid> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_game_type_round_trip() {
        assert_eq!(GameType::from_str("cash").unwrap(), GameType::Cash);
        assert_eq!(
            GameType::from_str("TOURNAMENT").unwrap(),
            GameType::Tournament
        );
        assert!(GameType::from_str("omaha").is_err());
    }

    #[test]
    fn test_single_participant_rejected() {
        let a = Uuid::new_v4();
        let result = validate_participants(&[member(a, "100", "150")], &roster(&[a]));
        assert_eq!(result.unwrap_err(), ParticipantError::TooFew);
    }

    #[test]
    fn test_two_members_accepted() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let validated = validate_participants(
            &[member(a, "100.00", "150.00"), member(b, "100.00", "50.00")],
            &roster(&[a, b]),
        )
        .unwrap();
        assert_eq!(validated.len(), 2);
        assert_eq!(validated[0].identity, ParticipantIdentity::Member(a));
    }

    #[test]
    fn test_non_member_participant_rejected() {
        let (a, stranger) = (Uuid::new_v4(), Uuid::new_v4());
        let result = validate_participants(
            &[member(a, "100", "150"), member(stranger, "100", "50")],
            &roster(&[a]),
        );
        assert_eq!(result.unwrap_err(), ParticipantError::NotAGroupMember);
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let a = Uuid::new_v4();
        let result = validate_participants(
            &[member(a, "100", "150"), member(a, "50", "20")],
            &roster(&[a]),
        );
        assert_eq!(result.unwrap_err(), ParticipantError::DuplicateMember);
    }

    #[test]
    fn test_guests_exempt_from_membership_and_may_repeat_names() {
        // Two guests with the same name are accepted at entry time; they only
        // merge later during aggregation.
        let validated = validate_participants(
            &[guest("Zé", "100", "0"), guest("Zé", "50", "150")],
            &roster(&[]),
        )
        .unwrap();
        assert_eq!(validated.len(), 2);
    }

    #[test]
    fn test_both_identities_rejected() {
        let a = Uuid::new_v4();
        let bad = ParticipantInput {
            user_id: Some(a),
            guest_name: Some("Someone".to_string()),
            spent: "10".to_string(),
            won: "0".to_string(),
        };
        let result = validate_participants(&[bad, guest("Other", "10", "20")], &roster(&[a]));
        assert_eq!(result.unwrap_err(), ParticipantError::AmbiguousIdentity);
    }

    #[test]
    fn test_blank_guest_name_counts_as_missing() {
        let result = validate_participants(
            &[guest("   ", "10", "0"), guest("Other", "10", "20")],
            &roster(&[]),
        );
        assert_eq!(result.unwrap_err(), ParticipantError::MissingIdentity);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = validate_participants(
            &[guest("A", "-5", "0"), guest("B", "10", "20")],
            &roster(&[]),
        );
        assert!(matches!(
            result.unwrap_err(),
            ParticipantError::BadAmount { field: "spent", .. }
        ));
    }

    #[test]
    fn test_sub_cent_amount_rejected() {
        let result = validate_participants(
            &[guest("A", "5", "0.005"), guest("B", "10", "20")],
            &roster(&[]),
        );
        assert!(matches!(
            result.unwrap_err(),
            ParticipantError::BadAmount { field: "won", .. }
        ));
    }
}
