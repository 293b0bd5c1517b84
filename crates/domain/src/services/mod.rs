//! Pure domain services. No I/O; everything here is deterministic and
//! unit-tested in isolation.

pub mod aggregation;
pub mod blind_timer;
