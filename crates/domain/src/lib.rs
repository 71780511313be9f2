//! # Punchclock Domain
//!
//! Domain types for the Punchclock timeclock client.
//!
//! This crate contains:
//! - Work hierarchy, punch state and submission request types
//! - The error taxonomy shared by every session component
//! - Client configuration structures
//! - Wire-format constants and timestamp helpers
//!
//! ## Architecture
//! - Depends only on `punchclock-common` for error classification
//! - No I/O; pure data and validation

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::timestamp::{format_human, parse_punch_timestamp};
