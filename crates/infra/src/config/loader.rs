//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the environment when one exists
//! 2. Attempts to load from environment variables
//! 3. If `PUNCHCLOCK_API_BASE_URL` is absent, falls back to a config file
//! 4. Probes multiple paths for config files (JSON or TOML)
//!
//! Whatever the source, the result is validated before it is returned.
//!
//! ## Environment Variables
//! - `PUNCHCLOCK_API_BASE_URL`: API base URL (required)
//! - `PUNCHCLOCK_REQUEST_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `PUNCHCLOCK_RETRY_MAX_ATTEMPTS`: Attempts per request, first included
//! - `PUNCHCLOCK_RETRY_BASE_BACKOFF_MS`: First retry delay in milliseconds
//! - `PUNCHCLOCK_RESYNC_AFTER_MUTATION`: Re-query the punch after a change
//! - `PUNCHCLOCK_LOG_LEVEL`: Default log filter directive
//! - `PUNCHCLOCK_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./punchclock.toml`, `./punchclock.json`, `./config.toml`,
//!    `./config.json` (current working directory)
//! 2. The same names in the parent and grandparent directories
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use punchclock_domain::{ClientConfig, PunchClockError, Result};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["punchclock.toml", "punchclock.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `PunchClockError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A value fails validation
pub fn load() -> Result<ClientConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }

    if std::env::var_os("PUNCHCLOCK_API_BASE_URL").is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    tracing::debug!("PUNCHCLOCK_API_BASE_URL not set, trying config file");
    load_from_file(None)
}

/// Load configuration from environment variables
///
/// Only the base URL is required; every other setting keeps its default
/// unless the matching variable is set.
///
/// # Errors
/// Returns `PunchClockError::Config` if the base URL is missing or a
/// variable has an invalid value.
pub fn load_from_env() -> Result<ClientConfig> {
    let mut config = ClientConfig::new(env_var("PUNCHCLOCK_API_BASE_URL")?);

    if let Some(secs) = env_parse::<u64>("PUNCHCLOCK_REQUEST_TIMEOUT_SECS")? {
        config.api.request_timeout_secs = secs;
    }
    if let Some(attempts) = env_parse::<u32>("PUNCHCLOCK_RETRY_MAX_ATTEMPTS")? {
        config.retry.max_attempts = attempts;
    }
    if let Some(backoff) = env_parse::<u64>("PUNCHCLOCK_RETRY_BASE_BACKOFF_MS")? {
        config.retry.base_backoff_ms = backoff;
        config.retry.max_backoff_ms = config.retry.max_backoff_ms.max(backoff);
    }
    config.session.resync_after_mutation =
        env_bool("PUNCHCLOCK_RESYNC_AFTER_MUTATION", config.session.resync_after_mutation);
    if let Ok(level) = std::env::var("PUNCHCLOCK_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("PUNCHCLOCK_LOG_JSON", config.logging.json);

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `PunchClockError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - A value fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PunchClockError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PunchClockError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PunchClockError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `PunchClockError::Config` if format is invalid or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PunchClockError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PunchClockError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(PunchClockError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.is_file())
}

/// Get required environment variable
///
/// # Errors
/// Returns `PunchClockError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| PunchClockError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional environment variable.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| PunchClockError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const VARS: [&str; 7] = [
        "PUNCHCLOCK_API_BASE_URL",
        "PUNCHCLOCK_REQUEST_TIMEOUT_SECS",
        "PUNCHCLOCK_RETRY_MAX_ATTEMPTS",
        "PUNCHCLOCK_RETRY_BASE_BACKOFF_MS",
        "PUNCHCLOCK_RESYNC_AFTER_MUTATION",
        "PUNCHCLOCK_LOG_LEVEL",
        "PUNCHCLOCK_LOG_JSON",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("PUNCHCLOCK_TEST_BOOL_YES", "Yes");
        std::env::set_var("PUNCHCLOCK_TEST_BOOL_OFF", "off");
        std::env::remove_var("PUNCHCLOCK_TEST_BOOL_MISSING");

        assert!(env_bool("PUNCHCLOCK_TEST_BOOL_YES", false));
        assert!(!env_bool("PUNCHCLOCK_TEST_BOOL_OFF", true));
        assert!(env_bool("PUNCHCLOCK_TEST_BOOL_MISSING", true));

        std::env::remove_var("PUNCHCLOCK_TEST_BOOL_YES");
        std::env::remove_var("PUNCHCLOCK_TEST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("PUNCHCLOCK_API_BASE_URL", "https://clock.example.com/api");

        let config = load_from_env().unwrap();

        assert_eq!(config, ClientConfig::new("https://clock.example.com/api"));
        clear_env();
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("PUNCHCLOCK_API_BASE_URL", "http://localhost:8080");
        std::env::set_var("PUNCHCLOCK_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("PUNCHCLOCK_RETRY_MAX_ATTEMPTS", "1");
        std::env::set_var("PUNCHCLOCK_RETRY_BASE_BACKOFF_MS", "10000");
        std::env::set_var("PUNCHCLOCK_RESYNC_AFTER_MUTATION", "false");
        std::env::set_var("PUNCHCLOCK_LOG_LEVEL", "debug");
        std::env::set_var("PUNCHCLOCK_LOG_JSON", "1");

        let config = load_from_env().unwrap();

        assert_eq!(config.api.request_timeout_secs, 5);
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.retry.base_backoff_ms, 10_000);
        assert_eq!(config.retry.max_backoff_ms, 10_000);
        assert!(!config.session.resync_after_mutation);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_base_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();

        assert!(matches!(err, PunchClockError::Config(msg) if msg.contains("PUNCHCLOCK_API_BASE_URL")));
    }

    #[test]
    fn test_load_from_env_invalid_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("PUNCHCLOCK_API_BASE_URL", "https://clock.example.com");
        std::env::set_var("PUNCHCLOCK_REQUEST_TIMEOUT_SECS", "soon");

        assert!(matches!(load_from_env(), Err(PunchClockError::Config(_))));

        std::env::set_var("PUNCHCLOCK_REQUEST_TIMEOUT_SECS", "0");
        assert!(matches!(load_from_env(), Err(PunchClockError::Config(_))));

        std::env::remove_var("PUNCHCLOCK_REQUEST_TIMEOUT_SECS");
        std::env::set_var("PUNCHCLOCK_API_BASE_URL", "ftp://clock.example.com");
        assert!(matches!(load_from_env(), Err(PunchClockError::Config(_))));
        clear_env();
    }

    #[test]
    fn test_parse_config_by_extension() {
        let toml = "[api]\nbase_url = \"https://clock.example.com\"\n";
        let config = parse_config(toml, Path::new("punchclock.toml")).unwrap();
        assert_eq!(config.api.base_url, "https://clock.example.com");

        let json = r#"{"api": {"base_url": "https://clock.example.com", "request_timeout_secs": 9}}"#;
        let config = parse_config(json, Path::new("config.json")).unwrap();
        assert_eq!(config.api.request_timeout_secs, 9);

        let err = parse_config(toml, Path::new("config.yaml")).unwrap_err();
        assert!(matches!(err, PunchClockError::Config(msg) if msg.contains("yaml")));
    }

    #[test]
    fn test_load_from_file_not_found() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/punchclock.toml"))).unwrap_err();

        assert!(matches!(err, PunchClockError::Config(msg) if msg.contains("not found")));
    }
}
