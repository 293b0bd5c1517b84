//! Repository implementations.

pub mod admin;
pub mod blind_preset;
pub mod dashboard;
pub mod game;
pub mod group;
pub mod invite;
pub mod user;

pub use admin::AdminRepository;
pub use blind_preset::BlindPresetRepository;
pub use dashboard::DashboardRepository;
pub use game::GameRepository;
pub use group::GroupRepository;
pub use invite::InviteRepository;
pub use user::UserRepository;
