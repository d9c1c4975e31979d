//! Concrete transports
//!
//! All socket and libssh2 code is isolated here; `core` only sees the
//! [`crate::core::Transport`] trait.

pub mod ssh;

pub use ssh::{SshConnector, SshTransport};
