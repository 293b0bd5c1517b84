//! Request extractors.

pub mod session;

pub use session::{AdminSession, UserSession};
