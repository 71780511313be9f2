use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;
use punchclock_common::resilience::{RetryConfig, RetryDecision, RetryExecutor};
use punchclock_domain::{ApiError, PunchClockError, RetrySettings};
use reqwest::{Client as ReqwestClient, Method, Request, RequestBuilder, Response};
use tracing::debug;

use crate::errors::{IntoApiError, IntoPunchClockError};

/// Which transport failures may be retried for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryScope {
    /// Any transport failure; the request is safe to repeat.
    Idempotent,
    /// Only failures where the request never reached the server.
    ConnectOnly,
}

impl RetryScope {
    /// GET is repeatable; anything else might create a second record.
    pub fn for_method(method: &Method) -> Self {
        if *method == Method::GET {
            Self::Idempotent
        } else {
            Self::ConnectOnly
        }
    }

    fn allows(self, err: &reqwest::Error) -> bool {
        if err.is_connect() {
            return true;
        }
        match self {
            Self::Idempotent => err.is_timeout() || err.is_request(),
            Self::ConnectOnly => false,
        }
    }
}

/// HTTP client with built-in retry and timeout support.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: RetryConfig,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient").field("retry", &self.retry).finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, PunchClockError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    pub const fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Execute the provided request builder with retry semantics.
    ///
    /// Non-2xx responses are returned as-is; only transport failures are
    /// retried, and only the ones `scope` allows.
    pub async fn send(&self, builder: RequestBuilder, scope: RetryScope) -> Result<Response, ApiError> {
        let request = builder.build().map_err(IntoApiError::into_api_error)?;
        let method = request.method().clone();
        let url = request.url().clone();

        let policy = move |err: &AttemptError, _attempt: u32| match err {
            AttemptError::Http(err) if scope.allows(err) => RetryDecision::Retry,
            _ => RetryDecision::Stop,
        };

        // Request bodies are Send but not necessarily Sync.
        let template = Mutex::new(request);
        let executor = RetryExecutor::new(self.retry.clone(), policy);
        let outcome = executor
            .execute(|attempt| {
                let replay = template.lock().try_clone();
                let method = method.clone();
                let url = url.clone();
                async move { self.execute_once(replay, attempt, &method, &url).await }
            })
            .await;

        outcome.map_err(|err| match err.into_inner() {
            Some(AttemptError::Http(err)) => err.into_api_error(),
            Some(AttemptError::NotReplayable) => {
                ApiError::Config("request body cannot be cloned; buffer the body to enable retries".into())
            }
            None => ApiError::Config("invalid retry configuration".into()),
        })
    }

    async fn execute_once(
        &self,
        request: Option<Request>,
        attempt: u32,
        method: &Method,
        url: &url::Url,
    ) -> Result<Response, AttemptError> {
        let request = request.ok_or(AttemptError::NotReplayable)?;
        debug!(attempt, %method, path = url.path(), "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(attempt, %method, path = url.path(), status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(attempt, %method, path = url.path(), error = %err, "HTTP request failed");
                Err(AttemptError::Http(err))
            }
        }
    }
}

#[derive(Debug)]
enum AttemptError {
    Http(reqwest::Error),
    NotReplayable,
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(err) => write!(f, "{err}"),
            Self::NotReplayable => f.write_str("request cannot be replayed"),
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    retry: RetryConfig,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.retry.max_attempts = attempts.max(1);
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Exponential backoff from configured settings.
    pub fn retry_settings(self, settings: &RetrySettings) -> Self {
        self.retry(RetryConfig::exponential(
            settings.max_attempts.max(1),
            Duration::from_millis(settings.base_backoff_ms),
            Duration::from_millis(settings.max_backoff_ms),
        ))
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, PunchClockError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(IntoPunchClockError::into_punchclock)?;

        Ok(HttpClient { client, retry: self.retry })
    }
}
