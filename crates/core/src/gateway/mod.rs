//! Remote API boundary and payload decoding helpers.

pub mod ports;

use punchclock_domain::utils::wire;
use punchclock_domain::ApiError;
use serde::de::DeserializeOwned;
use tracing::error;

pub use ports::{ApiGateway, ApiRequest, CredentialProvider};

/// Decode a payload into `T`.
///
/// A shape mismatch is a local bug, not a user error, so it is logged at
/// error level before being returned as [`ApiError::MalformedResponse`].
pub fn decode<T: DeserializeOwned>(payload: serde_json::Value, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(payload).map_err(|err| malformed(what, &err))
}

/// Decode a list payload (bare array, `value` wrapper or single object).
pub fn decode_list<T: DeserializeOwned>(
    payload: &serde_json::Value,
    what: &str,
) -> Result<Vec<T>, ApiError> {
    wire::list_items(payload).into_iter().map(|item| decode(item, what)).collect()
}

pub(crate) fn malformed(what: &str, detail: &dyn std::fmt::Display) -> ApiError {
    error!(payload = what, error = %detail, "Malformed response payload");
    ApiError::MalformedResponse(format!("{what}: {detail}"))
}
