//! Observability infrastructure for logging and gateway metrics
//!
//! ## Design Principles
//!
//! 1. **Poison Recovery**: metric locks recover the inner data instead of
//!    panicking; a lost sample is preferable to a crashed punch.
//!
//! 2. **Ring Buffers**: latency samples live in a bounded `VecDeque` with
//!    O(1) eviction.
//!
//! 3. **Idempotent Setup**: installing the tracing subscriber twice is not an
//!    error; the second call reports `false`.

pub mod logging;
pub mod metrics;

pub use logging::{init_tracing, LoggingError};
pub use metrics::{GatewayMetrics, MetricsSnapshot};

/// Metrics error type
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Empty data set - cannot calculate aggregate metric
    #[error("Empty data: cannot calculate {metric}")]
    EmptyData {
        /// Metric name that failed (e.g., "P95", "P50")
        metric: &'static str,
    },
}

/// Result type for metrics operations
pub type MetricsResult<T> = Result<T, MetricsError>;
