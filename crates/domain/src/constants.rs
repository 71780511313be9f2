//! Application constants
//!
//! Centralized location for wire-format strings, display formats and
//! user-facing messages shared by the session components.

// Backend
pub const DEFAULT_API_BASE_URL: &str = "https://app-brizbee-api-prod.azurewebsites.net";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const AUTH_METHOD_PIN: &str = "pin";

// Device metadata
pub const DEFAULT_SOURCE_HARDWARE: &str = "Mobile";
pub const NOT_APPLICABLE: &str = "N/A";

// Timestamp formats
pub const PUNCH_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";
pub const PUNCH_TIMESTAMP_NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
pub const HUMAN_TIMESTAMP_FORMAT: &str = "%b %d, %Y %-I:%M %p";
pub const ENTERED_AT_FORMAT: &str = "%Y-%m-%d";

// Timecard limits
pub const MAX_TIMECARD_HOURS: u32 = 23;
pub const MAX_TIMECARD_MINUTES_PART: u32 = 59;
pub const MAX_TIMECARD_TOTAL_MINUTES: u32 = MAX_TIMECARD_HOURS * 60 + MAX_TIMECARD_MINUTES_PART;

// User-facing messages
pub const NO_TASK_FOR_NUMBER_MESSAGE: &str = "No task matches that task number.";
pub const NO_ITEM_FOR_BAR_CODE_MESSAGE: &str = "No item matches that bar code value.";
pub const DEFAULT_SERVER_MESSAGE: &str = "Something went wrong on the server. Please try again.";
pub const ALERT_TITLE: &str = "Oops!";
