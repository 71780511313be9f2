//! Error classification shared by every Punchclock error type.
//!
//! Concrete error enums live next to the code that produces them (the domain
//! crate holds the API taxonomy). This module only defines the vocabulary used
//! to reason about them uniformly: can the caller retry, how loud should the
//! log line be, and does the session have to be thrown away.

use std::fmt;
use std::time::Duration;

/// Uniform classification for error types.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient: connectivity loss, timeouts and
    /// generic server failures. Input the server rejected is never retryable
    /// without a change from the user.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if the error means the held credential is no longer valid and the
    /// user must authenticate again.
    fn requires_reauthentication(&self) -> bool {
        false
    }

    /// Check if this is a critical error requiring immediate attention
    ///
    /// Critical errors indicate a local bug, such as a response shape the
    /// client does not understand.
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
