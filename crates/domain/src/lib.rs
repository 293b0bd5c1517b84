//! Domain layer for the Poker Ledger backend.
//!
//! This crate contains:
//! - Domain models (users, groups, invites, games, blind presets)
//! - Pure business logic services (ledger aggregation, blind timer)

pub mod models;
pub mod services;
