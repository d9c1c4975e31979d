//! Single-command execution inside an open session
//!
//! The remote exit status is authoritative: a command succeeds only when it
//! exits with status 0, whatever it printed. Timeouts and transport faults
//! become failed [`CommandResult`]s rather than errors, and the session is
//! left open so the caller can decide whether to carry on.

use super::session::Session;
use crate::utils::SessionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Outcome of one remote command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    pub command: String,
    pub succeeded: bool,
    pub stdout: String,
    /// Remote standard error, or the failure description for transport faults
    pub stderr: String,
    /// `None` for transport faults or when the remote reported no status
    pub exit_status: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub duration_seconds: f64,
}

impl CommandResult {
    /// Result for a command that never produced an exit status
    pub fn transport_failure(
        command: &str,
        message: impl Into<String>,
        started_at: DateTime<Utc>,
        duration_seconds: f64,
    ) -> Self {
        Self {
            command: command.to_string(),
            succeeded: false,
            stdout: String::new(),
            stderr: message.into(),
            exit_status: None,
            started_at,
            duration_seconds,
        }
    }
}

/// Run `command` on an open session, waiting at most `timeout`
///
/// # Errors
///
/// Only [`SessionError::NotConnected`], when the session is not open. No
/// transport call is made in that case.
pub async fn run_command(
    session: &mut Session,
    command: &str,
    timeout: Duration,
) -> Result<CommandResult, SessionError> {
    if !session.is_open() {
        tracing::error!(host = %session.host(), command, "command issued on a session that is not open");
        return Err(SessionError::NotConnected);
    }

    tracing::info!(host = %session.host(), command, "executing command");
    let started_at = Utc::now();
    let clock = Instant::now();

    let outcome = match tokio::time::timeout(timeout, session.exec(command, timeout)).await {
        Ok(result) => result,
        Err(_) => Err(SessionError::Timeout(timeout)),
    };
    let duration_seconds = clock.elapsed().as_secs_f64();

    let result = match outcome {
        Ok(output) => {
            let succeeded = output.exit_status == Some(0);
            if succeeded {
                tracing::info!(host = %session.host(), command, duration_seconds, "command succeeded");
            } else {
                tracing::warn!(
                    host = %session.host(),
                    command,
                    exit_status = ?output.exit_status,
                    "command failed"
                );
            }
            CommandResult {
                command: command.to_string(),
                succeeded,
                stdout: output.stdout,
                stderr: output.stderr,
                exit_status: output.exit_status,
                started_at,
                duration_seconds,
            }
        }
        Err(err) => {
            let message = format!("Command execution error: {err}");
            tracing::error!(host = %session.host(), command, "{}", message);
            CommandResult::transport_failure(command, message, started_at, duration_seconds)
        }
    };

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock_transport::{MockReply, MockTransport};
    use crate::models::Credentials;

    async fn open_session(mock: MockTransport) -> Session {
        let mut session = Session::new("10.0.0.1", Box::new(mock));
        let creds = Credentials::from_parts("admin", "secret", None).unwrap();
        assert!(session.open(&creds, Duration::from_secs(5)).await.success);
        session
    }

    #[tokio::test]
    async fn test_exit_zero_with_no_output_succeeds() {
        let mock = MockTransport::new().with_reply("true", MockReply::exit(0, "", ""));
        let mut session = open_session(mock).await;

        let result = run_command(&mut session, "true", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(result.succeeded);
        assert_eq!(result.stdout, "");
        assert_eq!(result.exit_status, Some(0));
        session.close().await;
    }

    #[tokio::test]
    async fn test_nonzero_exit_with_output_fails() {
        let mock = MockTransport::new().with_reply(
            "show ip interface brief",
            MockReply::exit(1, "Interface  IP-Address  OK?\nGi0/0  10.0.0.1  YES", ""),
        );
        let mut session = open_session(mock).await;

        let result = run_command(&mut session, "show ip interface brief", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(!result.succeeded);
        assert!(result.stdout.contains("Gi0/0"));
        assert_eq!(result.exit_status, Some(1));
        session.close().await;
    }

    #[tokio::test]
    async fn test_unknown_exit_status_fails() {
        let mock = MockTransport::new().with_default_reply(MockReply::Exit {
            stdout: "looks fine".to_string(),
            stderr: String::new(),
            status: None,
        });
        let mut session = open_session(mock).await;

        let result = run_command(&mut session, "uptime", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(!result.succeeded);
        session.close().await;
    }

    #[tokio::test]
    async fn test_full_output_is_kept() {
        let big = "x".repeat(256 * 1024);
        let mock = MockTransport::new().with_reply("dump", MockReply::ok(&big));
        let mut session = open_session(mock).await;

        let result = run_command(&mut session, "dump", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(result.stdout.len(), big.len());
        session.close().await;
    }

    #[tokio::test]
    async fn test_transport_fault_becomes_failed_result() {
        let mock = MockTransport::new().with_reply(
            "ps aux",
            MockReply::TransportError("channel closed by peer".to_string()),
        );
        let mut session = open_session(mock).await;

        let result = run_command(&mut session, "ps aux", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(!result.succeeded);
        assert_eq!(result.stdout, "");
        assert!(result.stderr.contains("channel closed by peer"));
        assert_eq!(result.exit_status, None);
        assert!(session.is_open());
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_failed_result_and_keeps_session() {
        let mock = MockTransport::new().with_reply("top", MockReply::Hang);
        let mut session = open_session(mock).await;

        let result = run_command(&mut session, "top", Duration::from_secs(2))
            .await
            .unwrap();
        assert!(!result.succeeded);
        assert!(result.stderr.contains("Timeout after 2s"));
        assert!(result.duration_seconds >= 2.0);
        assert!(session.is_open());
        session.close().await;
    }

    #[tokio::test]
    async fn test_not_connected_makes_no_transport_call() {
        let mock = MockTransport::new();
        let handle = mock.handle();
        let mut session = Session::new("10.0.0.1", Box::new(mock));

        let result = run_command(&mut session, "uptime", Duration::from_secs(5)).await;
        assert_eq!(result, Err(SessionError::NotConnected));
        assert!(handle.executed().is_empty());
    }

    #[tokio::test]
    async fn test_closed_session_is_not_connected() {
        let mock = MockTransport::new();
        let mut session = open_session(mock).await;
        session.close().await;

        let result = run_command(&mut session, "uptime", Duration::from_secs(5)).await;
        assert_eq!(result, Err(SessionError::NotConnected));
    }
}
