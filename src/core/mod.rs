//! Core probing logic (transport-agnostic)
//!
//! This module MUST NOT touch sockets or libssh2 directly; concrete
//! transports live in `crate::platform`.

pub mod batch;
pub mod executor;
pub mod health;
pub mod probes;
pub mod registry;
pub mod session;

// Scripted transport for tests
#[cfg(test)]
pub mod mock_transport;

pub use batch::{BatchResult, BatchRunner};
pub use executor::{run_command, CommandResult};
pub use health::{evaluate, health_score, HealthReport, HealthStatus};
pub use probes::{CommandCatalog, ConnectionTestReport, Probe};
pub use registry::{DeviceProfile, DeviceRegistry};
pub use session::{ConnectFailure, ConnectionOutcome, Connector, ExecOutput, Session, Transport};
