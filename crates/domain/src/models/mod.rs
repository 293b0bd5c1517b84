//! Domain model definitions.

pub mod blind_preset;
pub mod dashboard;
pub mod game;
pub mod group;
pub mod invite;
pub mod user;

pub use blind_preset::{BlindLevel, BlindPreset, CreatePresetRequest};
pub use dashboard::{
    GameDigest, GroupBreakdownEntry, GroupDashboard, GroupSummary, PlayerStanding, UserDashboard,
    UserGameDigest, UserSummary,
};
pub use game::{GameType, ParticipantIdentity, ParticipantInput, ValidatedParticipant};
pub use group::{AssignableRole, Group, GroupMembership, GroupRole};
pub use invite::{InviteStatus, INVITE_TTL_DAYS};
pub use user::{PublicUser, User};
