//! Application services shared across route handlers.

pub mod authorization;
pub mod cookies;
