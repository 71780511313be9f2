//! Client configuration
//!
//! Every section has defaults except the API base URL. Route paths are
//! configurable because the backend has moved endpoints between revisions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SOURCE_HARDWARE};
use crate::errors::{PunchClockError, Result};
use crate::impl_label_conversions;

/// Top-level configuration of a timeclock client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Defaults for everything but the base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                routes: ApiRoutes::default(),
            },
            retry: RetrySettings::default(),
            device: DeviceConfig::default(),
            session: SessionSettings::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Check values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns `PunchClockError::Config` for a base URL that is not an
    /// absolute http(s) URL, a zero timeout, zero retry attempts, a backoff
    /// ceiling below the base delay, or an empty route path.
    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(PunchClockError::Config("api.base_url must not be empty".into()));
        }
        let parsed = url::Url::parse(base_url)
            .map_err(|e| PunchClockError::Config(format!("Invalid api.base_url '{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PunchClockError::Config(format!(
                "api.base_url must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(PunchClockError::Config("api.request_timeout_secs must be > 0".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(PunchClockError::Config("retry.max_attempts must be > 0".into()));
        }
        if self.retry.max_backoff_ms < self.retry.base_backoff_ms {
            return Err(PunchClockError::Config(
                "retry.max_backoff_ms must be >= retry.base_backoff_ms".into(),
            ));
        }
        for route in ApiRoute::ALL {
            if self.api.routes.path(route).trim().is_empty() {
                return Err(PunchClockError::Config(format!("api.routes.{route} must not be empty")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub routes: ApiRoutes,
}

impl ApiConfig {
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Backend operations the client calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiRoute {
    Authenticate,
    Me,
    TimeZones,
    CurrentPunch,
    PunchIn,
    PunchOut,
    SearchTasks,
    Customers,
    Projects,
    Tasks,
    Timecard,
    InventorySearch,
    InventoryConsume,
}

impl_label_conversions!(ApiRoute {
    Authenticate => "authenticate",
    Me => "me",
    TimeZones => "time_zones",
    CurrentPunch => "current_punch",
    PunchIn => "punch_in",
    PunchOut => "punch_out",
    SearchTasks => "search_tasks",
    Customers => "customers",
    Projects => "projects",
    Tasks => "tasks",
    Timecard => "timecard",
    InventorySearch => "inventory_search",
    InventoryConsume => "inventory_consume",
});

impl ApiRoute {
    pub const ALL: [Self; 13] = [
        Self::Authenticate,
        Self::Me,
        Self::TimeZones,
        Self::CurrentPunch,
        Self::PunchIn,
        Self::PunchOut,
        Self::SearchTasks,
        Self::Customers,
        Self::Projects,
        Self::Tasks,
        Self::Timecard,
        Self::InventorySearch,
        Self::InventoryConsume,
    ];

    pub const fn method(self) -> HttpMethod {
        match self {
            Self::Authenticate
            | Self::PunchIn
            | Self::PunchOut
            | Self::Timecard
            | Self::InventoryConsume => HttpMethod::Post,
            _ => HttpMethod::Get,
        }
    }

    /// Whether the call carries the bearer credential.
    pub const fn requires_auth(self) -> bool {
        !matches!(self, Self::Authenticate)
    }
}

/// Path of every route, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiRoutes {
    pub authenticate: String,
    pub me: String,
    pub time_zones: String,
    pub current_punch: String,
    pub punch_in: String,
    pub punch_out: String,
    pub search_tasks: String,
    pub customers: String,
    pub projects: String,
    pub tasks: String,
    pub timecard: String,
    pub inventory_search: String,
    pub inventory_consume: String,
}

impl Default for ApiRoutes {
    fn default() -> Self {
        Self {
            authenticate: "/api/Auth/Authenticate".into(),
            me: "/api/Auth/Me".into(),
            time_zones: "/api/Kiosk/TimeZones".into(),
            current_punch: "/api/Kiosk/Punches/Current".into(),
            punch_in: "/api/Kiosk/PunchIn".into(),
            punch_out: "/api/Kiosk/PunchOut".into(),
            search_tasks: "/api/Kiosk/SearchTasks".into(),
            customers: "/api/Kiosk/Customers".into(),
            projects: "/api/Kiosk/Projects".into(),
            tasks: "/api/Kiosk/Tasks".into(),
            timecard: "/api/Kiosk/Timecard".into(),
            inventory_search: "/api/Kiosk/InventoryItems/Search".into(),
            inventory_consume: "/api/Kiosk/InventoryItems/Consume".into(),
        }
    }
}

impl ApiRoutes {
    pub fn path(&self, route: ApiRoute) -> &str {
        match route {
            ApiRoute::Authenticate => &self.authenticate,
            ApiRoute::Me => &self.me,
            ApiRoute::TimeZones => &self.time_zones,
            ApiRoute::CurrentPunch => &self.current_punch,
            ApiRoute::PunchIn => &self.punch_in,
            ApiRoute::PunchOut => &self.punch_out,
            ApiRoute::SearchTasks => &self.search_tasks,
            ApiRoute::Customers => &self.customers,
            ApiRoute::Projects => &self.projects,
            ApiRoute::Tasks => &self.tasks,
            ApiRoute::Timecard => &self.timecard,
            ApiRoute::InventorySearch => &self.inventory_search,
            ApiRoute::InventoryConsume => &self.inventory_consume,
        }
    }
}

/// Retry of transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self { max_attempts: 3, base_backoff_ms: 200, max_backoff_ms: 5_000 }
    }
}

/// Device description overrides; detection fills whatever is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub hardware: String,
    pub operating_system: Option<String>,
    pub operating_system_version: Option<String>,
    pub hostname: Option<String>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            hardware: DEFAULT_SOURCE_HARDWARE.to_string(),
            operating_system: None,
            operating_system_version: None,
            hostname: None,
        }
    }
}

/// What happens when no location fix is known at punch time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationPolicy {
    /// Send empty latitude and longitude.
    #[default]
    BestEffort,
    /// Refuse the punch locally.
    Required,
}

impl_label_conversions!(LocationPolicy {
    BestEffort => "best_effort",
    Required => "required",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Re-query the current punch after a successful punch in or out.
    pub resync_after_mutation: bool,
    pub location_policy: LocationPolicy,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { resync_after_mutation: true, location_policy: LocationPolicy::BestEffort }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".into(), json: false }
    }
}
