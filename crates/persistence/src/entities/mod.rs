//! Entity definitions (database row mappings).

pub mod blind_preset;
pub mod game;
pub mod group;
pub mod invite;
pub mod user;

pub use blind_preset::BlindPresetEntity;
pub use game::{
    GameEntity, GameParticipantEntity, GameTypeDb, ParticipationEntity, UserParticipationEntity,
};
pub use group::{
    AdminGroupEntity, GroupEntity, GroupMembershipEntity, GroupRoleDb, GroupWithMembershipEntity,
    MemberWithUserEntity,
};
pub use invite::{GroupInviteEntity, InviteStatusDb, InviteWithContextEntity};
pub use user::{AdminUserEntity, UserEntity};
