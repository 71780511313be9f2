//! Port interfaces for remote API access
//!
//! The gateway is the only component allowed to perform network I/O. Core
//! services describe calls as [`ApiRequest`] values and receive either the
//! decoded JSON payload or a classified [`ApiError`].

use async_trait::async_trait;
use punchclock_domain::{ApiError, ApiRoute, HttpMethod};

/// One call against the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub route: ApiRoute,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Attach the bearer credential; fail with `Unauthenticated` without one.
    pub authenticated: bool,
}

impl ApiRequest {
    /// Request for `route` using its usual method and auth requirement.
    pub fn new(route: ApiRoute) -> Self {
        Self {
            method: route.method(),
            route,
            query: Vec::new(),
            body: None,
            authenticated: route.requires_auth(),
        }
    }

    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn with_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of the first query parameter named `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Transport to the backend.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Perform the call and return the JSON payload.
    ///
    /// An empty 2xx body is returned as `Value::Null`.
    async fn request(&self, request: ApiRequest) -> Result<serde_json::Value, ApiError>;
}

/// Source of the bearer header for authenticated calls.
pub trait CredentialProvider: Send + Sync {
    /// `Bearer <token>`, or `None` when nobody is signed in.
    fn bearer_header(&self) -> Option<String>;

    /// Forget the credential after the server rejected it.
    fn invalidate(&self);
}
