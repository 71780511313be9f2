//! Logging subscriber initialisation.

use punchclock_domain::{LoggingConfig, PunchClockError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Failure to set up logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },
}

impl From<LoggingError> for PunchClockError {
    fn from(err: LoggingError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` overrides `config.level`. Returns `Ok(false)` when a global
/// subscriber is already installed, leaving it in place.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] when neither `RUST_LOG` nor the
/// configured level is a valid filter directive.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool, LoggingError> {
    let filter = build_env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true),
            )
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer().compact().with_target(true)).try_init()
    };

    Ok(installed.is_ok())
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directive = format!("{},hyper=warn,reqwest=warn", config.level.trim());
    EnvFilter::try_new(&directive)
        .map_err(|e| LoggingError::InvalidFilter { directive, message: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_initialisation_is_a_no_op() {
        let config = LoggingConfig::default();

        init_tracing(&config).unwrap();

        assert!(!init_tracing(&config).unwrap());
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig { level: "punchclock=loud".into(), json: false };

        let err = build_env_filter(&config).unwrap_err();

        assert!(matches!(err, LoggingError::InvalidFilter { .. }));
        assert!(matches!(PunchClockError::from(err), PunchClockError::Config(_)));
    }
}
