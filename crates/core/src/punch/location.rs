//! Latest known device position.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use punchclock_domain::GeoLocation;

/// Keeps the most recent position fix delivered by the platform.
///
/// Location updates arrive on their own schedule; a punch uses whatever was
/// last seen and never waits for a fresh fix.
#[derive(Debug, Default)]
pub struct LocationCache {
    latest: RwLock<Option<(GeoLocation, DateTime<Utc>)>>,
}

impl LocationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, fix: GeoLocation) {
        *self.latest.write() = Some((fix, Utc::now()));
    }

    pub fn latest(&self) -> Option<GeoLocation> {
        self.latest.read().map(|(fix, _)| fix)
    }

    /// When the latest fix was recorded.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.latest.read().map(|(_, at)| at)
    }

    pub fn clear(&self) {
        *self.latest.write() = None;
    }
}
