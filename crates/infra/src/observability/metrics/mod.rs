//! Gateway call metrics.

pub mod call;

pub use call::{GatewayMetrics, MetricsSnapshot, OUTCOME_SUCCESS};
