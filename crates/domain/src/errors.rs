//! Error types used throughout the timeclock client
//!
//! [`ApiError`] is the transport-level taxonomy every remote call reports.
//! Each session component wraps it in its own error so callers can match on
//! the outcomes that matter to them (invalid PIN, nothing punched in, unknown
//! task number) without inspecting HTTP details.

use std::time::Duration;

use punchclock_common::{ErrorClassification, ErrorSeverity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_SERVER_MESSAGE, NO_ITEM_FOR_BAR_CODE_MESSAGE, NO_TASK_FOR_NUMBER_MESSAGE,
};

/// General error for setup and wiring (configuration, platform probes).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PunchClockError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for setup operations
pub type Result<T> = std::result::Result<T, PunchClockError>;

/// Outcome of a remote call that did not produce a usable payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server could not be reached or the connection broke mid-call.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The call needs a credential and none is held.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The server rejected the held credential (HTTP 401).
    #[error("Unauthorized: the session is no longer valid")]
    Unauthorized,

    /// The server rejected the request (HTTP 400). Carries the response body.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: String },

    /// A 2xx response whose body does not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The request was abandoned because the session ended.
    #[error("Request cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Stable label used in logs and metrics.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Unauthenticated => "unauthenticated",
            Self::Unauthorized => "unauthorized",
            Self::BadRequest(_) => "bad_request",
            Self::NotFound => "not_found",
            Self::Server { .. } => "server",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Cancelled => "cancelled",
            Self::Config(_) => "config",
        }
    }

    /// Message suitable for an alert shown to the user.
    ///
    /// Server-provided text for 400 responses is passed through verbatim,
    /// because the backend phrases its validation failures for end users.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(detail) => {
                format!("Unable to reach the server. Check your connection and try again. ({detail})")
            }
            Self::Unauthenticated | Self::Unauthorized => {
                "Your session has expired. Please sign in again.".to_string()
            }
            Self::BadRequest(body) if !body.trim().is_empty() => body.trim().to_string(),
            Self::BadRequest(_) | Self::Server { .. } => DEFAULT_SERVER_MESSAGE.to_string(),
            Self::NotFound => "The requested record could not be found.".to_string(),
            Self::MalformedResponse(_) => {
                "The server sent a response this app does not understand.".to_string()
            }
            Self::Cancelled => "The request was cancelled.".to_string(),
            Self::Config(detail) => format!("The app is not configured correctly: {detail}"),
        }
    }
}

impl ErrorClassification for ApiError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Server { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Cancelled | Self::NotFound => ErrorSeverity::Info,
            Self::Transport(_)
            | Self::Unauthenticated
            | Self::Unauthorized
            | Self::BadRequest(_) => ErrorSeverity::Warning,
            Self::Server { .. } | Self::Config(_) => ErrorSeverity::Error,
            Self::MalformedResponse(_) => ErrorSeverity::Critical,
        }
    }

    fn requires_reauthentication(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::Unauthorized)
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Server { status: 503, .. } => Some(Duration::from_secs(1)),
            _ => None,
        }
    }
}

/// Input rejected locally before any network call is made.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("You must provide an organization code.")]
    EmptyOrganizationCode,

    #[error("You must provide a PIN.")]
    EmptyPin,

    #[error("You must provide a task number.")]
    EmptyTaskNumber,

    #[error("You must provide a bar code value.")]
    EmptyBarCode,

    #[error("You must select a task.")]
    MissingTask,

    #[error("You must choose a time zone.")]
    MissingTimeZone,

    #[error("Hours must be between 0 and 23, got {0}.")]
    HoursOutOfRange(u32),

    #[error("Minutes must be between 0 and 59, got {0}.")]
    MinutesOutOfRange(u32),

    #[error("A time entry must be between 1 and 1439 minutes, got {0}.")]
    DurationOutOfRange(u32),

    #[error("Quantity must be greater than zero.")]
    NonPositiveQuantity,

    #[error("You must select an inventory item.")]
    MissingInventoryItem,

    #[error("Latitude {latitude} / longitude {longitude} is not a valid position.")]
    InvalidLocation { latitude: f64, longitude: f64 },
}

impl ErrorClassification for ValidationError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Info
    }
}

/// Failure of a PIN authentication attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The organization code or PIN was rejected.
    #[error("The organization code or PIN is not valid.")]
    InvalidCredentials,

    #[error("Unable to reach the server: {0}")]
    Transport(String),

    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::BadRequest(_) | ApiError::Unauthorized => Self::InvalidCredentials,
            ApiError::Transport(detail) => Self::Transport(detail),
            other => Self::Api(other),
        }
    }
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::Transport(detail) => ApiError::Transport(detail.clone()).user_message(),
            other => other.to_string(),
        }
    }
}

impl ErrorClassification for AuthError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api(err) => err.is_retryable(),
            Self::Invalid(_) | Self::InvalidCredentials => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Invalid(_) | Self::InvalidCredentials => ErrorSeverity::Info,
            Self::Transport(_) => ErrorSeverity::Warning,
            Self::Api(err) => err.severity(),
        }
    }
}

/// Failure of a punch operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PunchError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// Punch out was requested while the user is known to be punched out.
    #[error("You are not punched in.")]
    NotPunchedIn,

    /// Another punch in or punch out is still running.
    #[error("A punch is already being recorded. Please wait.")]
    MutationInProgress,

    #[error("The time zone '{0}' is not one of the supported time zones.")]
    UnknownTimeZone(String),

    /// The organization requires a location fix and none was supplied.
    #[error("Your organization requires your location to punch in or out.")]
    LocationRequired,
}

impl PunchError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

impl ErrorClassification for PunchError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Api(err) => err.is_retryable(),
            Self::MutationInProgress => true,
            _ => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Api(err) => err.severity(),
            _ => ErrorSeverity::Info,
        }
    }

    fn requires_reauthentication(&self) -> bool {
        matches!(self, Self::Api(err) if err.requires_reauthentication())
    }
}

/// Failure to turn a task number into a task.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{msg} ({0})", msg = NO_TASK_FOR_NUMBER_MESSAGE)]
    NoTaskForNumber(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ResolveError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(err) => err.to_string(),
            Self::NoTaskForNumber(_) => NO_TASK_FOR_NUMBER_MESSAGE.to_string(),
            Self::Api(err) => err.user_message(),
        }
    }
}

impl ErrorClassification for ResolveError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_retryable())
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Api(err) => err.severity(),
            _ => ErrorSeverity::Info,
        }
    }

    fn requires_reauthentication(&self) -> bool {
        matches!(self, Self::Api(err) if err.requires_reauthentication())
    }
}

/// Failure of a timecard or inventory submission.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmissionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{msg} ({0})", msg = NO_ITEM_FOR_BAR_CODE_MESSAGE)]
    NoItemForBarCode(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SubmissionError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(err) => err.to_string(),
            Self::NoItemForBarCode(_) => NO_ITEM_FOR_BAR_CODE_MESSAGE.to_string(),
            Self::Api(err) => err.user_message(),
        }
    }
}

impl ErrorClassification for SubmissionError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_retryable())
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Api(err) => err.severity(),
            _ => ErrorSeverity::Info,
        }
    }

    fn requires_reauthentication(&self) -> bool {
        matches!(self, Self::Api(err) if err.requires_reauthentication())
    }
}
