//! netprobe - SSH health and command probing for network devices and servers
//!
//! Opens one authenticated shell session per call, runs vendor-appropriate
//! commands in order, and grades the results.

pub mod config;
pub mod constants;
pub mod core;
pub mod logger;
pub mod models;
pub mod normalize;
pub mod platform;
pub mod utils;

// Re-export commonly used types
pub use crate::config::ProbeConfig;
pub use crate::core::{
    BatchResult, CommandResult, ConnectionOutcome, DeviceRegistry, HealthReport, HealthStatus,
    Probe, Session,
};
pub use crate::models::{Credentials, Device, DeviceTypeTag, SecureString, Username};
pub use crate::utils::{ProbeError, SessionError, ValidationError};
