//! Conversions from third-party infrastructure errors into domain errors.

pub mod conversions;

pub use conversions::{IntoApiError, IntoPunchClockError};
