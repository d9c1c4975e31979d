//! Device record handed over by the device store

use crate::normalize::normalize_device_type;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vendor/platform identifier used to pick a command dialect
///
/// An open set: any string is a valid tag, unknown tags simply select the
/// fallback command lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceTypeTag(String);

impl DeviceTypeTag {
    pub fn new(tag: impl Into<String>) -> Self {
        DeviceTypeTag(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical lookup key (trimmed, lowercase)
    pub fn key(&self) -> String {
        normalize_device_type(&self.0)
    }
}

impl fmt::Display for DeviceTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceTypeTag {
    fn from(value: &str) -> Self {
        DeviceTypeTag::new(value)
    }
}

/// Managed device as known to the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: u64,
    pub name: String,
    /// Hostname or IP address reachable over SSH
    pub address: String,
    pub device_type: DeviceTypeTag,
}

impl Device {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        address: impl Into<String>,
        device_type: impl Into<DeviceTypeTag>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            device_type: device_type.into(),
        }
    }
}
