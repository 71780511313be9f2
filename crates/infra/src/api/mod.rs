//! Remote API access
//!
//! [`HttpApiGateway`] is the production [`punchclock_core::ApiGateway`]:
//! the only place in the workspace that talks to the backend.

pub mod gateway;

pub use gateway::{classify_response, HttpApiGateway};
