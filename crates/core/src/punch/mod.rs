//! Punch session lifecycle

pub mod location;
pub mod service;

pub use location::LocationCache;
pub use service::{CachedPunchState, PunchSessionManager};
