//! Device capability registry: vendor CLI dialects as plain data
//!
//! Maps a device-type tag to the commands that make sense on that platform.
//! Built once, never mutated, and safe to read from any number of tasks.
//! Unknown tags are not an error: they get an empty catalog and generic
//! fallback command lists.

use crate::models::DeviceTypeTag;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

const FALLBACK_TEST_COMMANDS: &[&str] = &["echo 'Connection Test'", "whoami", "pwd"];
const FALLBACK_HEALTH_COMMANDS: &[&str] = &["echo 'Unknown device type'"];
const FALLBACK_INFO_COMMANDS: &[&str] = &["echo 'Device info not available for this type'"];

/// Command dialect for one device type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceProfile {
    /// Operational commands by short name (e.g. `show_version`)
    pub named_commands: BTreeMap<String, String>,
    /// Read-only commands used to smoke-test a fresh connection
    pub test_commands: Vec<String>,
    /// Commands whose exit status gauges liveness
    pub health_commands: Vec<String>,
    /// Inventory commands for a quick information sweep
    pub info_commands: Vec<String>,
}

impl DeviceProfile {
    fn new(
        named: &[(&str, &str)],
        test: &[&str],
        health: &[&str],
        info: &[&str],
    ) -> Self {
        let owned = |list: &[&str]| list.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        Self {
            named_commands: named
                .iter()
                .map(|(name, cmd)| (name.to_string(), cmd.to_string()))
                .collect(),
            test_commands: owned(test),
            health_commands: owned(health),
            info_commands: owned(info),
        }
    }
}

/// Immutable lookup table from normalised tag to [`DeviceProfile`]
#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    profiles: HashMap<String, DeviceProfile>,
}

impl DeviceRegistry {
    /// Registry with the built-in dialects
    pub fn builtin() -> Self {
        let mut profiles = HashMap::new();

        profiles.insert(
            "cisco_ios".to_string(),
            DeviceProfile::new(
                &[
                    ("show_version", "show version"),
                    ("show_interfaces", "show ip interface brief"),
                    ("show_running_config", "show running-config"),
                    ("show_vlan", "show vlan brief"),
                    ("save_config", "write memory"),
                    ("show_inventory", "show inventory"),
                ],
                &[
                    "show version | include Software",
                    "show ip interface brief | count",
                    "show users",
                ],
                &["show version", "show ip interface brief"],
                &["show version", "show ip interface brief", "show inventory"],
            ),
        );

        profiles.insert(
            "cisco_asa".to_string(),
            DeviceProfile::new(
                &[
                    ("show_version", "show version"),
                    ("show_interfaces", "show interface ip brief"),
                    ("show_running_config", "show running-config"),
                    ("show_failover", "show failover"),
                    ("show_connections", "show conn count"),
                    ("save_config", "write memory"),
                ],
                &["show version | include Software", "show interface ip brief"],
                &["show version", "show interface ip brief"],
                &["show version", "show interface ip brief", "show inventory"],
            ),
        );

        profiles.insert(
            "mikrotik".to_string(),
            DeviceProfile::new(
                &[
                    ("show_version", "/system resource print"),
                    ("show_interfaces", "/interface print"),
                    ("show_ip_addresses", "/ip address print"),
                    ("show_routes", "/ip route print"),
                    ("export_config", "/export compact"),
                    ("show_system", "/system identity print"),
                ],
                &[
                    "/system identity print",
                    "/system resource print",
                    "/interface print count-only",
                ],
                &["/system resource print", "/interface print"],
                &[
                    "/system resource print",
                    "/system identity print",
                    "/interface print",
                ],
            ),
        );

        profiles.insert(
            "ubuntu".to_string(),
            DeviceProfile::new(
                &[
                    ("show_version", "lsb_release -a"),
                    ("show_interfaces", "ip addr show"),
                    ("show_routes", "ip route show"),
                    ("show_processes", "ps aux"),
                    ("show_disk", "df -h"),
                    ("show_memory", "free -h"),
                ],
                &["uname -a", "whoami", "uptime", "ip addr show | grep -c inet"],
                &["uptime", "ip addr show"],
                &["uname -a", "ip addr show", "uptime"],
            ),
        );

        profiles.insert(
            "windows".to_string(),
            DeviceProfile::new(
                &[
                    ("show_version", "ver"),
                    ("show_interfaces", "ipconfig /all"),
                    ("show_routes", "route print"),
                    ("show_services", "net start"),
                    ("show_processes", "tasklist"),
                ],
                &["ver", "whoami", "ipconfig | findstr IPv4"],
                &["ver", "ipconfig"],
                &["ver", "ipconfig /all", "hostname"],
            ),
        );

        profiles.insert(
            "juniper".to_string(),
            DeviceProfile::new(
                &[
                    ("show_version", "show version"),
                    ("show_interfaces", "show interfaces terse"),
                    ("show_routes", "show route summary"),
                    ("show_configuration", "show configuration | display set"),
                    ("show_alarms", "show system alarms"),
                ],
                &["show version | match Junos", "show interfaces terse | count"],
                &["show version", "show system alarms"],
                &["show version", "show interfaces terse", "show chassis hardware"],
            ),
        );

        Self { profiles }
    }

    /// Shared read-only instance of [`DeviceRegistry::builtin`]
    pub fn global() -> &'static DeviceRegistry {
        static REGISTRY: OnceLock<DeviceRegistry> = OnceLock::new();
        REGISTRY.get_or_init(DeviceRegistry::builtin)
    }

    fn profile(&self, tag: &DeviceTypeTag) -> Option<&DeviceProfile> {
        self.profiles.get(&tag.key())
    }

    pub fn is_known(&self, tag: &DeviceTypeTag) -> bool {
        self.profile(tag).is_some()
    }

    /// Known device-type keys, sorted
    pub fn device_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Named command catalog, empty for unknown tags
    pub fn commands_for(&self, tag: &DeviceTypeTag) -> BTreeMap<String, String> {
        self.profile(tag)
            .map(|p| p.named_commands.clone())
            .unwrap_or_default()
    }

    pub fn test_commands_for(&self, tag: &DeviceTypeTag) -> Vec<String> {
        self.list_or_fallback(tag, |p| &p.test_commands, FALLBACK_TEST_COMMANDS)
    }

    pub fn health_commands_for(&self, tag: &DeviceTypeTag) -> Vec<String> {
        self.list_or_fallback(tag, |p| &p.health_commands, FALLBACK_HEALTH_COMMANDS)
    }

    pub fn info_commands_for(&self, tag: &DeviceTypeTag) -> Vec<String> {
        self.list_or_fallback(tag, |p| &p.info_commands, FALLBACK_INFO_COMMANDS)
    }

    fn list_or_fallback<F>(&self, tag: &DeviceTypeTag, pick: F, fallback: &[&str]) -> Vec<String>
    where
        F: Fn(&DeviceProfile) -> &Vec<String>,
    {
        match self.profile(tag).map(pick) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => {
                tracing::debug!(device_type = %tag, "no dialect entry, using fallback commands");
                fallback.iter().map(|c| c.to_string()).collect()
            }
        }
    }
}
