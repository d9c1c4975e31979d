//! # Crate-Wide Constants
//!
//! Default timeouts, pacing and scoring policy used by netprobe.
//!
//! Runtime values live in [`crate::config::ProbeConfig`], which starts from
//! these defaults and may be overridden per deployment.
//!
//! ```rust
//! use netprobe::constants::*;
//! use std::time::Duration;
//!
//! let timeout = Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS);
//! ```

// ============================================================================
// Network Defaults
// ============================================================================

/// Port used when the caller does not specify one
pub const DEFAULT_SSH_PORT: u16 = 22;

// ============================================================================
// Timeouts
// ============================================================================

/// Bound on the whole handshake (TCP connect + key exchange + auth) for
/// single-command and batch operations
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Handshake bound for connectivity tests
///
/// **Rationale**: tests are often the first contact with a new device, where
/// reverse-DNS lookups on the device side can stall the banner.
pub const TEST_CONNECT_TIMEOUT_SECS: u64 = 15;

/// Handshake bound for health checks
///
/// **Rationale**: a loaded device should still be reported as reachable and
/// scored rather than marked unhealthy because the banner was slow.
pub const HEALTH_CONNECT_TIMEOUT_SECS: u64 = 20;

/// Bound on a single remote command, from exec to exit status
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Pacing
// ============================================================================

/// Pause between consecutive commands of a batch (seconds)
///
/// **Rationale**: several vendor CLIs (older IOS images, RouterOS) drop
/// input when exec requests arrive back-to-back. Zero or negative disables.
pub const DEFAULT_INTER_COMMAND_DELAY_SECS: f64 = 1.0;

/// Number of registry test commands a connectivity test runs
pub const MAX_CONNECTION_TEST_COMMANDS: usize = 3;

// ============================================================================
// Health Scoring
// ============================================================================

/// Minimum score (inclusive) reported as healthy
pub const HEALTHY_SCORE_THRESHOLD: f64 = 80.0;

/// Minimum score (inclusive) reported as degraded; anything lower is unhealthy
pub const DEGRADED_SCORE_THRESHOLD: f64 = 50.0;
