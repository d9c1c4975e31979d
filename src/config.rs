//! Runtime configuration for probe operations

use crate::constants::*;
use crate::models::DeviceTypeTag;
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::time::Duration;

const ENV_CONNECT_TIMEOUT: &str = "NETPROBE_CONNECT_TIMEOUT_SECS";
const ENV_TEST_TIMEOUT: &str = "NETPROBE_TEST_TIMEOUT_SECS";
const ENV_HEALTH_TIMEOUT: &str = "NETPROBE_HEALTH_TIMEOUT_SECS";
const ENV_COMMAND_TIMEOUT: &str = "NETPROBE_COMMAND_TIMEOUT_SECS";
const ENV_COMMAND_DELAY: &str = "NETPROBE_COMMAND_DELAY_SECS";

/// Timeouts and pacing used by [`crate::core::Probe`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    #[serde(deserialize_with = "positive_secs")]
    pub connect_timeout_secs: u64,
    #[serde(deserialize_with = "positive_secs")]
    pub test_connect_timeout_secs: u64,
    #[serde(deserialize_with = "positive_secs")]
    pub health_connect_timeout_secs: u64,
    #[serde(deserialize_with = "positive_secs")]
    pub command_timeout_secs: u64,
    /// Pause between batch commands; zero or negative disables
    pub inter_command_delay_secs: f64,
    /// Per device-type pacing overrides, keyed by normalised tag
    pub device_delays: HashMap<String, f64>,
}

/// Timeouts must be at least one second, matching the env override rules
fn positive_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u64::deserialize(deserializer)?;
    if value == 0 {
        return Err(de::Error::invalid_value(
            Unexpected::Unsigned(0),
            &"a timeout of at least one second",
        ));
    }
    Ok(value)
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            test_connect_timeout_secs: TEST_CONNECT_TIMEOUT_SECS,
            health_connect_timeout_secs: HEALTH_CONNECT_TIMEOUT_SECS,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            inter_command_delay_secs: DEFAULT_INTER_COMMAND_DELAY_SECS,
            device_delays: HashMap::new(),
        }
    }
}

impl ProbeConfig {
    /// Defaults overridden by `NETPROBE_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply overrides from any key/value source. Unparseable values are
    /// ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let secs = |key: &str, target: &mut u64| {
            if let Some(raw) = lookup(key) {
                match raw.trim().parse::<u64>() {
                    Ok(value) if value > 0 => *target = value,
                    _ => tracing::warn!(key, value = %raw, "ignoring invalid timeout override"),
                }
            }
        };

        secs(ENV_CONNECT_TIMEOUT, &mut self.connect_timeout_secs);
        secs(ENV_TEST_TIMEOUT, &mut self.test_connect_timeout_secs);
        secs(ENV_HEALTH_TIMEOUT, &mut self.health_connect_timeout_secs);
        secs(ENV_COMMAND_TIMEOUT, &mut self.command_timeout_secs);

        if let Some(raw) = lookup(ENV_COMMAND_DELAY) {
            match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => self.inter_command_delay_secs = value,
                _ => tracing::warn!(
                    key = ENV_COMMAND_DELAY,
                    value = %raw,
                    "ignoring invalid delay override"
                ),
            }
        }
    }

    /// Set a pacing override for one device type
    pub fn with_device_delay(mut self, device_type: &str, delay_secs: f64) -> Self {
        self.device_delays
            .insert(DeviceTypeTag::new(device_type).key(), delay_secs);
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn test_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.test_connect_timeout_secs)
    }

    pub fn health_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.health_connect_timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Pacing for a device type, falling back to the global delay
    pub fn delay_for(&self, device_type: &DeviceTypeTag) -> f64 {
        self.device_delays
            .get(&device_type.key())
            .copied()
            .unwrap_or(self.inter_command_delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.test_connect_timeout(), Duration::from_secs(15));
        assert_eq!(config.health_connect_timeout(), Duration::from_secs(20));
        assert_eq!(config.command_timeout(), Duration::from_secs(30));
        assert_eq!(config.inter_command_delay_secs, 1.0);
    }

    #[test]
    fn test_overrides() {
        let mut config = ProbeConfig::default();
        config.apply_overrides(|key| match key {
            "NETPROBE_CONNECT_TIMEOUT_SECS" => Some("5".to_string()),
            "NETPROBE_COMMAND_DELAY_SECS" => Some("0.25".to_string()),
            _ => None,
        });
        assert_eq!(config.connect_timeout_secs, 5);
        assert_eq!(config.inter_command_delay_secs, 0.25);
        assert_eq!(config.command_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let mut config = ProbeConfig::default();
        config.apply_overrides(|key| match key {
            "NETPROBE_COMMAND_TIMEOUT_SECS" => Some("soon".to_string()),
            "NETPROBE_HEALTH_TIMEOUT_SECS" => Some("0".to_string()),
            "NETPROBE_COMMAND_DELAY_SECS" => Some("NaN".to_string()),
            _ => None,
        });
        assert_eq!(config, ProbeConfig::default());
    }

    #[test]
    fn test_device_delay_override() {
        let config = ProbeConfig::default().with_device_delay("MikroTik", 2.5);
        assert_eq!(config.delay_for(&DeviceTypeTag::new("mikrotik")), 2.5);
        assert_eq!(config.delay_for(&DeviceTypeTag::new("ubuntu")), 1.0);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ProbeConfig =
            serde_json::from_str(r#"{"command_timeout_secs": 60}"#).unwrap();
        assert_eq!(config.command_timeout_secs, 60);
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn test_deserialize_rejects_zero_timeouts() {
        for field in [
            "connect_timeout_secs",
            "test_connect_timeout_secs",
            "health_connect_timeout_secs",
            "command_timeout_secs",
        ] {
            let json = format!(r#"{{"{field}": 0}}"#);
            let err = serde_json::from_str::<ProbeConfig>(&json).unwrap_err();
            assert!(err.to_string().contains("at least one second"), "{field}: {err}");
        }
    }
}
