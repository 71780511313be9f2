//! Where a punch was recorded from.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SOURCE_HARDWARE, NOT_APPLICABLE};
use crate::errors::ValidationError;

/// Device description attached to punches and inventory consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMetadata {
    pub hardware: String,
    pub operating_system: String,
    pub operating_system_version: String,
    /// Always `N/A`: the client is not a browser.
    pub browser: String,
    pub browser_version: String,
    pub hostname: String,
}

impl Default for DeviceMetadata {
    fn default() -> Self {
        Self {
            hardware: DEFAULT_SOURCE_HARDWARE.to_string(),
            operating_system: String::new(),
            operating_system_version: String::new(),
            browser: NOT_APPLICABLE.to_string(),
            browser_version: NOT_APPLICABLE.to_string(),
            hostname: String::new(),
        }
    }
}

/// A position fix in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    latitude: f64,
    longitude: f64,
}

impl GeoLocation {
    /// # Errors
    ///
    /// Rejects non-finite values and coordinates outside the valid ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(ValidationError::InvalidLocation { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }

    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Latitude and longitude query values; empty strings when no fix is known.
pub(crate) fn location_query(location: Option<GeoLocation>) -> (String, String) {
    location.map_or_else(
        || (String::new(), String::new()),
        |fix| (fix.latitude.to_string(), fix.longitude.to_string()),
    )
}
