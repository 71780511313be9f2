//! Device metadata detection
//!
//! Fills the punch source fields from the running host. Configured values
//! win over detection; anything that cannot be detected is sent empty.

use punchclock_domain::{DeviceConfig, DeviceMetadata};
use sysinfo::System;
use tracing::debug;

/// Describe this device for punch and inventory requests.
pub fn detect(config: &DeviceConfig) -> DeviceMetadata {
    let metadata = merge(config, HostInfo::current());
    debug!(
        hardware = %metadata.hardware,
        os = %metadata.operating_system,
        os_version = %metadata.operating_system_version,
        "device metadata resolved"
    );
    metadata
}

#[derive(Debug, Default)]
struct HostInfo {
    os_name: Option<String>,
    os_version: Option<String>,
    host_name: Option<String>,
}

impl HostInfo {
    fn current() -> Self {
        Self {
            os_name: System::name(),
            os_version: System::os_version(),
            host_name: System::host_name(),
        }
    }
}

fn merge(config: &DeviceConfig, host: HostInfo) -> DeviceMetadata {
    let pick = |configured: &Option<String>, detected: Option<String>| {
        configured
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .or(detected)
            .unwrap_or_default()
    };

    let mut metadata = DeviceMetadata {
        operating_system: pick(&config.operating_system, host.os_name),
        operating_system_version: pick(&config.operating_system_version, host.os_version),
        hostname: pick(&config.hostname, host.host_name),
        ..DeviceMetadata::default()
    };
    if !config.hardware.trim().is_empty() {
        metadata.hardware = config.hardware.trim().to_string();
    }
    metadata
}
