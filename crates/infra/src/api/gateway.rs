//! HTTP implementation of the gateway port
//!
//! Builds the URL from the configured route table, attaches the bearer
//! credential, classifies the response and records metrics. A 401 on an
//! authenticated call invalidates the held credential.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::Mutex;
use punchclock_core::{ApiGateway, ApiRequest, CredentialProvider};
use punchclock_domain::{ApiError, ApiRoutes, ClientConfig, HttpMethod, PunchClockError};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::errors::{IntoApiError, IntoPunchClockError};
use crate::http::{HttpClient, RetryScope};
use crate::observability::GatewayMetrics;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Gateway to the timeclock backend over HTTP.
pub struct HttpApiGateway {
    http: HttpClient,
    base_url: Url,
    routes: ApiRoutes,
    credentials: Arc<dyn CredentialProvider>,
    metrics: Arc<GatewayMetrics>,
    cancel: Mutex<CancellationToken>,
}

impl std::fmt::Debug for HttpApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApiGateway")
            .field("base_url", &self.base_url.as_str())
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

impl HttpApiGateway {
    /// Create a gateway from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `PunchClockError::Config` when the configuration is invalid or
    /// the HTTP client cannot be built.
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, PunchClockError> {
        config.validate()?;

        let http = HttpClient::builder()
            .timeout(config.api.request_timeout())
            .retry_settings(&config.retry)
            .user_agent(concat!("punchclock/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = Url::parse(config.api.base_url.trim())
            .map_err(IntoPunchClockError::into_punchclock)?;

        Ok(Self {
            http,
            base_url,
            routes: config.api.routes.clone(),
            credentials,
            metrics: Arc::new(GatewayMetrics::new()),
            cancel: Mutex::new(CancellationToken::new()),
        })
    }

    /// Share a metrics collector with other components.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<GatewayMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Abort every request currently in flight with `ApiError::Cancelled`.
    ///
    /// Requests started afterwards are unaffected.
    pub fn cancel_in_flight(&self) {
        let previous = std::mem::replace(&mut *self.cancel.lock(), CancellationToken::new());
        previous.cancel();
        debug!("cancelled in-flight gateway requests");
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let path = self.routes.path(request.route);
        let base = self.base_url.as_str().trim_end_matches('/');
        let joined = format!("{base}/{}", path.trim_start_matches('/'));
        Url::parse(&joined).map_err(IntoApiError::into_api_error)
    }

    #[instrument(
        skip_all,
        fields(
            request_id = %Uuid::now_v7(),
            method = request.method.as_str(),
            path = %self.routes.path(request.route),
        )
    )]
    async fn dispatch(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let token = self.cancel.lock().clone();
        let started = Instant::now();

        let outcome = tokio::select! {
            () = token.cancelled() => Err(ApiError::Cancelled),
            result = self.perform(request) => result,
        };

        self.metrics.record(outcome.as_ref().map(|_| ()), started.elapsed());
        if let Err(err) = &outcome {
            debug!(outcome = err.label(), "request failed");
        }
        outcome
    }

    async fn perform(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.url_for(&request)?;

        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };

        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .query(&request.query);

        if request.authenticated {
            let bearer = self.credentials.bearer_header().ok_or(ApiError::Unauthenticated)?;
            builder = builder.header(AUTHORIZATION, bearer);
        }

        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| ApiError::Config(format!("Unserialisable request body: {e}")))?;
            builder = builder.body(bytes);
        }

        let response = self.http.send(builder, RetryScope::for_method(&method)).await?;
        let status = response.status();
        let body = response.text().await.map_err(IntoApiError::into_api_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        let outcome = classify_response(status, &body);
        if matches!(outcome, Err(ApiError::Unauthorized)) && request.authenticated {
            warn!(status = status.as_u16(), "credential rejected by server, invalidating session");
            self.credentials.invalidate();
        }
        outcome
    }
}

#[async_trait]
impl ApiGateway for HttpApiGateway {
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError> {
        self.dispatch(request).await
    }
}

/// Map an HTTP status and body to the gateway result.
///
/// A 2xx with an empty body is `Value::Null`.
pub fn classify_response(status: StatusCode, body: &str) -> Result<Value, ApiError> {
    if status.is_success() {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(body).map_err(|e| {
            error!(status = status.as_u16(), error = %e, "response body is not valid JSON");
            ApiError::MalformedResponse(format!("invalid JSON: {e}"))
        });
    }

    Err(match status {
        StatusCode::BAD_REQUEST => ApiError::BadRequest(server_message(body)),
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound,
        other => ApiError::Server { status: other.as_u16(), body: body.to_string() },
    })
}

/// Human text of a 400 body: a JSON string, a `Message` field, or the raw text.
fn server_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(message)) => message,
        Ok(Value::Object(fields)) => ["Message", "message", "error_description"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .map_or_else(|| body.trim().to_string(), str::to_string),
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_success_bodies() {
        assert_eq!(classify_response(StatusCode::OK, ""), Ok(Value::Null));
        assert_eq!(classify_response(StatusCode::NO_CONTENT, "  \n"), Ok(Value::Null));
        assert_eq!(classify_response(StatusCode::OK, "{\"Id\": 1}"), Ok(json!({"Id": 1})));
        assert!(matches!(
            classify_response(StatusCode::OK, "<html>"),
            Err(ApiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(classify_response(StatusCode::UNAUTHORIZED, ""), Err(ApiError::Unauthorized));
        assert_eq!(classify_response(StatusCode::NOT_FOUND, "gone"), Err(ApiError::NotFound));
        assert_eq!(
            classify_response(StatusCode::FORBIDDEN, "nope"),
            Err(ApiError::Server { status: 403, body: "nope".into() })
        );
        assert_eq!(
            classify_response(StatusCode::INTERNAL_SERVER_ERROR, ""),
            Err(ApiError::Server { status: 500, body: String::new() })
        );
    }

    #[test]
    fn test_bad_request_message_extraction() {
        let cases = [
            ("Task is closed.", "Task is closed."),
            ("\"You are not punched in.\"", "You are not punched in."),
            ("{\"Message\": \"Invalid PIN\"}", "Invalid PIN"),
            ("{\"code\": 7}", "{\"code\": 7}"),
        ];
        for (body, expected) in cases {
            assert_eq!(
                classify_response(StatusCode::BAD_REQUEST, body),
                Err(ApiError::BadRequest(expected.to_string()))
            );
        }
    }
}
