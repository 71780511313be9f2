//! # Punchclock Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The HTTP gateway to the timeclock backend (reqwest, retry, timeout)
//! - Configuration loading from the environment and TOML/JSON files
//! - Logging setup and gateway metrics
//! - Device metadata detection
//! - [`TimeclockContext`], which wires everything for one client
//!
//! ## Architecture
//! - Implements traits defined in `punchclock-core`
//! - Depends on `punchclock-common`, `punchclock-domain` and `punchclock-core`
//! - Contains all "impure" code (network, environment, host queries)

pub mod api;
pub mod config;
pub mod context;
pub mod errors;
pub mod http;
pub mod observability;
pub mod platform;

// Re-export commonly used items
pub use api::HttpApiGateway;
pub use context::TimeclockContext;
pub use errors::{IntoApiError, IntoPunchClockError};
pub use http::{HttpClient, HttpClientBuilder, RetryScope};
pub use observability::{init_tracing, GatewayMetrics};
