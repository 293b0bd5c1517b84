//! Shared utilities and common types for the Poker Ledger backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Exact decimal money arithmetic
//! - Password hashing with Argon2id
//! - Session token signing for the user and admin realms
//! - Opaque random tokens for invite links
//! - Offset pagination helpers

pub mod money;
pub mod pagination;
pub mod password;
pub mod session;
pub mod token;
