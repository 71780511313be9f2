//! Time zones offered by the backend.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::utils::wire;

/// The list of zone labels the backend accepts for punches.
///
/// Labels are kept as opaque strings. A label is only interpreted as an IANA
/// zone through [`TimeZoneCatalog::resolve`], which requires it to be listed
/// here and known to the tz database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeZoneCatalog {
    zones: Vec<String>,
}

impl TimeZoneCatalog {
    pub fn new<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { zones: zones.into_iter().map(Into::into).filter(|z: &String| !z.is_empty()).collect() }
    }

    /// Build the catalog from a time zone listing.
    ///
    /// Entries may be plain strings or objects carrying the label in `Id`
    /// (or `Name`); entries without a label are skipped.
    pub fn from_payload(payload: &serde_json::Value) -> Self {
        let zones = wire::list_items(payload)
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(label) => Some(label),
                serde_json::Value::Object(map) => map
                    .get("Id")
                    .or_else(|| map.get("Name"))
                    .and_then(serde_json::Value::as_str)
                    .map(ToString::to_string),
                _ => None,
            });
        Self::new(zones)
    }

    pub fn zones(&self) -> &[String] {
        &self.zones
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.zones.iter().any(|zone| zone == label)
    }

    /// Position of a label, used to preselect a picker row.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.zones.iter().position(|zone| zone == label)
    }

    /// Interpret a listed label as a real zone.
    pub fn resolve(&self, label: &str) -> Option<Tz> {
        if !self.contains(label) {
            return None;
        }
        label.parse::<Tz>().ok()
    }
}
