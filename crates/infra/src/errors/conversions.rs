//! Error conversion helpers
//!
//! `reqwest`, `url` and the filesystem report failures in their own types.
//! The traits below translate them into the domain taxonomy at the boundary
//! so nothing above this crate ever sees a transport library error.

use punchclock_domain::{ApiError, PunchClockError};

/// Translate an infrastructure error into the gateway taxonomy.
pub trait IntoApiError {
    fn into_api_error(self) -> ApiError;
}

/// Translate an infrastructure error raised during setup.
pub trait IntoPunchClockError {
    fn into_punchclock(self) -> PunchClockError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl IntoApiError for reqwest::Error {
    fn into_api_error(self) -> ApiError {
        if self.is_builder() {
            return ApiError::Config(format!("Invalid HTTP request: {self}"));
        }

        if self.is_timeout() {
            return ApiError::Transport("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ApiError::Transport(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() {
            return ApiError::MalformedResponse(format!("Unreadable response body: {self}"));
        }

        ApiError::Transport(self.to_string())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → ApiError */
/* -------------------------------------------------------------------------- */

impl IntoApiError for url::ParseError {
    fn into_api_error(self) -> ApiError {
        ApiError::Config(format!("Invalid request URL: {self}"))
    }
}

/* -------------------------------------------------------------------------- */
/* Setup errors → PunchClockError */
/* -------------------------------------------------------------------------- */

impl IntoPunchClockError for reqwest::Error {
    fn into_punchclock(self) -> PunchClockError {
        PunchClockError::Config(format!("Failed to build HTTP client: {self}"))
    }
}

impl IntoPunchClockError for url::ParseError {
    fn into_punchclock(self) -> PunchClockError {
        PunchClockError::Config(format!("Invalid api.base_url: {self}"))
    }
}

impl IntoPunchClockError for std::io::Error {
    fn into_punchclock(self) -> PunchClockError {
        PunchClockError::Platform(self.to_string())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::Client;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn timeout_maps_to_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client =
            Client::builder().no_proxy().timeout(Duration::from_millis(50)).build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap_err();

        assert_eq!(error.into_api_error(), ApiError::Transport("HTTP request timed out".into()));
    }

    #[tokio::test]
    async fn refused_connection_maps_to_transport_error() {
        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get("http://127.0.0.1:9/").send().await.unwrap_err();

        match error.into_api_error() {
            ApiError::Transport(message) => assert!(message.contains("connection")),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn bad_url_maps_to_config_error() {
        let error = url::Url::parse("not a url").unwrap_err();

        assert!(matches!(error.into_api_error(), ApiError::Config(_)));
        assert!(matches!(error.into_punchclock(), PunchClockError::Config(_)));
    }
}
