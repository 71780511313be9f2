//! Parsing and formatting helpers for the backend's wire conventions.

pub mod timestamp;
pub mod wire;
