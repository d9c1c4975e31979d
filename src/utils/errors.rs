//! Error types for netprobe
//!
//! All error types use thiserror for clean error handling.
//! SECURITY: Error messages MUST NOT contain passwords or sensitive data.

use crate::core::session::ConnectionOutcome;
use std::time::Duration;

/// Errors from remote session operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Remote host rejected the supplied credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Protocol negotiation failure, unreachable host, connection reset
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Command attempted on a session that is not open. This is a caller bug,
    /// not a remote fault.
    #[error("Session is not connected")]
    NotConnected,
}

/// Errors from validating caller-supplied device and credential input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Host address cannot be empty")]
    EmptyHost,

    #[error("Invalid port: {0}")]
    InvalidPort(u16),
}

/// Top-level error type for probe operations
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Connection failed: {}", .0.message)]
    Connection(ConnectionOutcome),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}
