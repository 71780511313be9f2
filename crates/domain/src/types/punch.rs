//! Punch state and punch requests.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::device::{location_query, DeviceMetadata, GeoLocation};
use super::timezone::TimeZoneCatalog;
use super::work::Task;
use crate::errors::ApiError;
use crate::utils::{timestamp, wire};

/// Whether the user is on the clock, as last reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PunchState {
    PunchedOut,
    PunchedIn(ActivePunch),
}

impl PunchState {
    pub const fn is_punched_in(&self) -> bool {
        matches!(self, Self::PunchedIn(_))
    }

    pub const fn active(&self) -> Option<&ActivePunch> {
        match self {
            Self::PunchedIn(active) => Some(active),
            Self::PunchedOut => None,
        }
    }

    /// Interpret the current-punch payload.
    ///
    /// `null`, `{}`, an empty array and an empty `value` wrapper mean punched
    /// out. Anything else must be a punch object (or a list whose first entry
    /// is one).
    ///
    /// # Errors
    ///
    /// [`ApiError::MalformedResponse`] when the punch object lacks a task or
    /// has an `InAt` that does not parse.
    pub fn from_current_payload(payload: &serde_json::Value) -> Result<Self, ApiError> {
        let Some(first) = wire::list_items(payload).into_iter().next() else {
            return Ok(Self::PunchedOut);
        };

        let wire_punch: CurrentPunchWire = serde_json::from_value(first)
            .map_err(|err| ApiError::MalformedResponse(format!("current punch: {err}")))?;
        let since = timestamp::parse_punch_timestamp(&wire_punch.in_at)
            .map_err(|err| ApiError::MalformedResponse(format!("current punch InAt: {err}")))?;

        Ok(Self::PunchedIn(ActivePunch {
            task: wire_punch.task,
            since,
            since_time_zone: wire_punch.in_at_time_zone.unwrap_or_default(),
        }))
    }
}

/// The open punch of a punched-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePunch {
    pub task: Task,
    /// Absolute instant of the punch in.
    pub since: DateTime<Utc>,
    /// Zone label captured at punch in, kept as an opaque display string.
    pub since_time_zone: String,
}

impl ActivePunch {
    pub fn task_label(&self) -> String {
        self.task.label()
    }

    pub fn job_label(&self) -> Option<String> {
        self.task.job.as_ref().map(super::work::Job::label)
    }

    pub fn customer_label(&self) -> Option<String> {
        self.task.customer().map(super::work::Customer::label)
    }

    /// Human rendering of [`Self::since`].
    ///
    /// Uses the captured zone when the catalog vouches for it, UTC otherwise.
    pub fn since_display(&self, catalog: &TimeZoneCatalog) -> String {
        timestamp::format_human(self.since, catalog.resolve(&self.since_time_zone))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CurrentPunchWire {
    #[serde(deserialize_with = "wire::lenient_string")]
    in_at: String,
    #[serde(default)]
    in_at_time_zone: Option<String>,
    task: Task,
}

/// Query parameters of a punch in.
#[derive(Debug, Clone, PartialEq)]
pub struct PunchInRequest {
    pub task_id: i64,
    pub time_zone: String,
    pub location: Option<GeoLocation>,
    pub device: DeviceMetadata,
}

impl PunchInRequest {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let (latitude, longitude) = location_query(self.location);
        vec![
            ("taskId".into(), self.task_id.to_string()),
            ("timeZone".into(), self.time_zone.clone()),
            ("latitude".into(), latitude),
            ("longitude".into(), longitude),
            ("sourceHardware".into(), self.device.hardware.clone()),
            ("sourceOperatingSystem".into(), self.device.operating_system.clone()),
            ("sourceOperatingSystemVersion".into(), self.device.operating_system_version.clone()),
            ("sourceBrowser".into(), self.device.browser.clone()),
            ("sourceBrowserVersion".into(), self.device.browser_version.clone()),
        ]
    }
}

/// Query parameters of a punch out.
#[derive(Debug, Clone, PartialEq)]
pub struct PunchOutRequest {
    pub time_zone: String,
    pub location: Option<GeoLocation>,
    pub device: DeviceMetadata,
}

impl PunchOutRequest {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let (latitude, longitude) = location_query(self.location);
        vec![
            ("timeZone".into(), self.time_zone.clone()),
            ("latitude".into(), latitude),
            ("longitude".into(), longitude),
            ("sourceHardware".into(), self.device.hardware.clone()),
            ("sourceOperatingSystem".into(), self.device.operating_system.clone()),
            ("sourceOperatingSystemVersion".into(), self.device.operating_system_version.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn punch_payload() -> serde_json::Value {
        json!({
            "Id": 991,
            "InAt": "2024-03-05T08:30:00-0600",
            "InAtTimeZone": "America/Chicago",
            "Task": {
                "Id": 42,
                "Number": "1000",
                "Name": "Framing",
                "Job": {
                    "Id": 7,
                    "Number": "J-7",
                    "Name": "Warehouse",
                    "CustomerId": 3,
                    "Customer": {"Id": 3, "Number": "C-3", "Name": "Acme"}
                }
            }
        })
    }

    #[test]
    fn test_empty_payloads_are_punched_out() {
        for payload in [json!(null), json!({}), json!([]), json!({"value": []})] {
            assert_eq!(PunchState::from_current_payload(&payload).unwrap(), PunchState::PunchedOut);
        }
    }

    #[test]
    fn test_punch_object_is_punched_in() {
        let state = PunchState::from_current_payload(&punch_payload()).unwrap();
        let active = state.active().unwrap();
        assert_eq!(active.task.id, 42);
        assert_eq!(active.since, Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap());
        assert_eq!(active.since_time_zone, "America/Chicago");
        assert_eq!(active.task_label(), "1000 - Framing");
        assert_eq!(active.job_label().as_deref(), Some("J-7 - Warehouse"));
        assert_eq!(active.customer_label().as_deref(), Some("C-3 - Acme"));

        let wrapped = PunchState::from_current_payload(&json!({"value": [punch_payload()]})).unwrap();
        assert!(wrapped.is_punched_in());
    }

    #[test]
    fn test_bad_in_at_is_malformed() {
        let mut payload = punch_payload();
        payload["InAt"] = json!("5 March");
        let err = PunchState::from_current_payload(&payload).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));

        let err = PunchState::from_current_payload(&json!({"InAt": "2024-03-05T08:30:00Z"})).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn test_since_display_uses_validated_zone_only() {
        let active = PunchState::from_current_payload(&punch_payload()).unwrap();
        let active = active.active().unwrap();

        let catalog = TimeZoneCatalog::new(["America/Chicago"]);
        assert_eq!(active.since_display(&catalog), "Mar 05, 2024 8:30 AM");
        assert_eq!(active.since_display(&TimeZoneCatalog::default()), "Mar 05, 2024 2:30 PM");
    }

    #[test]
    fn test_punch_in_query_order_and_placeholders() {
        let request = PunchInRequest {
            task_id: 42,
            time_zone: "America/Chicago".into(),
            location: None,
            device: DeviceMetadata {
                operating_system: "iOS".into(),
                operating_system_version: "17.4".into(),
                ..DeviceMetadata::default()
            },
        };
        let query = request.to_query();
        let keys: Vec<&str> = query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            [
                "taskId",
                "timeZone",
                "latitude",
                "longitude",
                "sourceHardware",
                "sourceOperatingSystem",
                "sourceOperatingSystemVersion",
                "sourceBrowser",
                "sourceBrowserVersion"
            ]
        );
        assert_eq!(query[2].1, "");
        assert_eq!(query[4].1, "Mobile");
        assert_eq!(query[8].1, "N/A");
    }

    #[test]
    fn test_punch_out_query_has_no_task_or_browser() {
        let request = PunchOutRequest {
            time_zone: "America/Chicago".into(),
            location: Some(GeoLocation::new(41.8, -87.6).unwrap()),
            device: DeviceMetadata::default(),
        };
        let query = request.to_query();
        assert_eq!(query.len(), 6);
        assert_eq!(query[1], ("latitude".to_string(), "41.8".to_string()));
        assert!(query.iter().all(|(k, _)| k != "taskId" && k != "sourceBrowser"));
    }
}
