//! # Utilities Module
//!
//! Cross-cutting concerns shared by the core and the transport layer.
//!
//! ## Modules
//!
//! - [`errors`]: Typed error hierarchy using `thiserror`
//! - [`retry`]: Opt-in exponential backoff for opening sessions
//!
//! ## Design Notes
//!
//! Error types live here to avoid circular dependencies between `core` and
//! `platform`. Retry is never applied inside a session or the command
//! executor; callers opt in through [`crate::core::Probe::with_retry`].

pub mod errors;
pub mod retry;

pub use errors::{ProbeError, SessionError, ValidationError};
pub use retry::{is_transient_error, retry_with_backoff, RetryConfig};
