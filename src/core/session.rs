//! Remote-shell session lifecycle
//!
//! A [`Session`] owns exactly one [`Transport`] to one host and walks the
//! states `Idle -> Open -> Closed`. The transport trait allows testing without
//! real devices; the SSH implementation lives in `src/platform/`.

use crate::models::Credentials;
use crate::utils::{is_transient_error, SessionError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw outcome of one remote execution as reported by the transport
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the remote side closed the channel without an exit status
    pub exit_status: Option<i32>,
}

/// Byte-level remote-shell capability behind a session
///
/// Implementations must bound `connect` and `exec` by the supplied timeout
/// where the underlying library allows it; the session adds an outer bound
/// regardless.
#[async_trait::async_trait]
pub trait Transport: Send {
    /// Network connect, protocol handshake and authentication
    async fn connect(
        &mut self,
        host: &str,
        port: u16,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<(), SessionError>;

    /// Run one command and collect its full output and exit status
    async fn exec(&mut self, command: &str, timeout: Duration) -> Result<ExecOutput, SessionError>;

    /// Release the connection. Must tolerate being called when nothing is connected.
    async fn close(&mut self);
}

/// Factory for fresh transports, one per session
pub trait Connector: Send + Sync {
    fn transport(&self) -> Box<dyn Transport>;
}

/// Why a session failed to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectFailure {
    Authentication,
    Transport,
    Timeout,
}

/// Success flag plus human-readable message for an open attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ConnectFailure>,
}

impl ConnectionOutcome {
    pub fn connected(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            failure: None,
        }
    }

    pub fn failed(failure: ConnectFailure, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            failure: Some(failure),
        }
    }

    /// Timeouts may clear up and authentication errors never do. Transport
    /// failures are judged by their message.
    pub fn is_transient(&self) -> bool {
        match self.failure {
            Some(ConnectFailure::Timeout) => true,
            Some(ConnectFailure::Transport) => is_transient_error(&self.message),
            Some(ConnectFailure::Authentication) | None => false,
        }
    }
}

impl std::fmt::Display for ConnectionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Idle,
    Open,
    /// Open attempt failed; the transport may still hold a half-built connection
    Failed,
    Closed,
}

/// One authenticated remote-shell connection to one host
///
/// Exclusively owned by the operation that created it, which must call
/// [`Session::close`] on every exit path. Never reused: once closed, build a
/// new session.
pub struct Session {
    host: String,
    port: u16,
    transport: Box<dyn Transport>,
    state: SessionState,
}

impl Session {
    pub fn new(host: impl Into<String>, transport: Box<dyn Transport>) -> Self {
        Self {
            host: host.into(),
            port: crate::constants::DEFAULT_SSH_PORT,
            transport,
            state: SessionState::Idle,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// Authenticate against the host. `timeout` bounds the whole handshake.
    ///
    /// Never fails with an error value: every fault is folded into the
    /// returned outcome.
    pub async fn open(&mut self, credentials: &Credentials, timeout: Duration) -> ConnectionOutcome {
        if self.state != SessionState::Idle {
            tracing::warn!(host = %self.host, "refusing to reopen a used session");
            return ConnectionOutcome::failed(
                ConnectFailure::Transport,
                format!("Session to {} was already used; open a new session", self.host),
            );
        }

        self.port = credentials.port();
        let username = credentials.username().as_str();
        tracing::info!(host = %self.host, port = self.port, user = username, "connecting");

        let attempt = self
            .transport
            .connect(&self.host, self.port, credentials, timeout);
        let result = match tokio::time::timeout(timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(SessionError::Timeout(timeout)),
        };

        match result {
            Ok(()) => {
                self.state = SessionState::Open;
                tracing::info!(host = %self.host, port = self.port, "connected");
                ConnectionOutcome::connected(format!("Successfully connected to {}", self.host))
            }
            Err(err) => {
                self.state = SessionState::Failed;
                let outcome = match err {
                    SessionError::Authentication(_) => ConnectionOutcome::failed(
                        ConnectFailure::Authentication,
                        format!("Authentication failed for {}@{}", username, self.host),
                    ),
                    SessionError::Timeout(_) => ConnectionOutcome::failed(
                        ConnectFailure::Timeout,
                        format!("Connection timeout to {}:{}", self.host, self.port),
                    ),
                    SessionError::Transport(detail) => ConnectionOutcome::failed(
                        ConnectFailure::Transport,
                        format!("SSH connection error: {detail}"),
                    ),
                    SessionError::NotConnected => ConnectionOutcome::failed(
                        ConnectFailure::Transport,
                        format!("SSH connection error: transport to {} not connected", self.host),
                    ),
                };
                tracing::error!(
                    host = %self.host,
                    port = self.port,
                    failure = ?outcome.failure,
                    "{}",
                    outcome.message
                );
                outcome
            }
        }
    }

    /// Run a command on the underlying transport. Requires an open session.
    pub(crate) async fn exec(
        &mut self,
        command: &str,
        timeout: Duration,
    ) -> Result<ExecOutput, SessionError> {
        if !self.is_open() {
            return Err(SessionError::NotConnected);
        }
        self.transport.exec(command, timeout).await
    }

    /// Release the transport. Idempotent; safe on sessions that never opened.
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.transport.close().await;
        self.state = SessionState::Closed;
        tracing::debug!(host = %self.host, port = self.port, "session closed");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.state == SessionState::Open {
            tracing::warn!(host = %self.host, "session dropped while open; close() was not called");
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("state", &self.state)
            .finish()
    }
}
