//! Route handlers.

pub mod admin;
pub mod auth;
pub mod blind_presets;
pub mod dashboard;
pub mod games;
pub mod groups;
pub mod health;
pub mod invites;
pub mod members;
pub mod public_join;
pub mod users;
