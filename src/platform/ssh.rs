//! SSH transport over libssh2
//!
//! `ssh2` is blocking, so every call runs on tokio's blocking pool. Each
//! blocking step is bounded twice: by the libssh2 session timeout here and by
//! `tokio::time::timeout` in the session and executor.
//!
//! Host keys are not verified; the device inventory is trusted.

use crate::core::session::{Connector, ExecOutput, Transport};
use crate::models::Credentials;
use crate::utils::SessionError;
use ssh2::{ErrorCode, Session};
use std::io::{self, Read};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// libssh2 `LIBSSH2_ERROR_TIMEOUT`
const LIBSSH2_ERROR_TIMEOUT: i32 = -9;

/// Password-authenticated SSH connection to one host
#[derive(Default)]
pub struct SshTransport {
    session: Option<Session>,
}

impl SshTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Hands out a fresh [`SshTransport`] per session
#[derive(Debug, Clone, Copy, Default)]
pub struct SshConnector;

impl Connector for SshConnector {
    fn transport(&self) -> Box<dyn Transport> {
        Box::new(SshTransport::new())
    }
}

fn timeout_ms(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX).max(1)
}

fn map_ssh_error(err: ssh2::Error, context: &str, timeout: Duration) -> SessionError {
    if matches!(err.code(), ErrorCode::Session(LIBSSH2_ERROR_TIMEOUT)) {
        SessionError::Timeout(timeout)
    } else {
        SessionError::Transport(format!("{context}: {err}"))
    }
}

fn map_io_error(err: io::Error, context: &str, timeout: Duration) -> SessionError {
    match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => SessionError::Timeout(timeout),
        _ => SessionError::Transport(format!("{context}: {err}")),
    }
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr, SessionError> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| SessionError::Transport(format!("Could not resolve host '{host}': {e}")))?
        .next()
        .ok_or_else(|| SessionError::Transport(format!("Could not resolve host '{host}'")))
}

fn handshake(
    host: &str,
    port: u16,
    username: &str,
    password: &str,
    timeout: Duration,
) -> Result<Session, SessionError> {
    let addr = resolve(host, port)?;
    let tcp = TcpStream::connect_timeout(&addr, timeout)
        .map_err(|e| map_io_error(e, &format!("SSH connect to {host}:{port} failed"), timeout))?;

    let mut sess = Session::new()
        .map_err(|e| SessionError::Transport(format!("SSH session init failed: {e}")))?;
    sess.set_timeout(timeout_ms(timeout));
    sess.set_tcp_stream(tcp);
    sess.handshake()
        .map_err(|e| map_ssh_error(e, "SSH handshake failed", timeout))?;

    if let Err(e) = sess.userauth_password(username, password) {
        if matches!(e.code(), ErrorCode::Session(LIBSSH2_ERROR_TIMEOUT)) {
            return Err(SessionError::Timeout(timeout));
        }
        return Err(SessionError::Authentication(e.message().to_string()));
    }
    if !sess.authenticated() {
        return Err(SessionError::Authentication(
            "server did not accept the password".to_string(),
        ));
    }

    Ok(sess)
}

fn exec_blocking(sess: &Session, command: &str, timeout: Duration) -> Result<ExecOutput, SessionError> {
    sess.set_timeout(timeout_ms(timeout));

    let mut channel = sess
        .channel_session()
        .map_err(|e| map_ssh_error(e, "SSH channel open failed", timeout))?;
    channel
        .exec(command)
        .map_err(|e| map_ssh_error(e, "SSH exec failed", timeout))?;

    // Streams are drained in sequence. A command that fills the stderr window
    // before stdout hits EOF stalls until the session timeout fires.
    let mut stdout = Vec::new();
    channel
        .read_to_end(&mut stdout)
        .map_err(|e| map_io_error(e, "SSH read failed", timeout))?;
    let mut stderr = Vec::new();
    channel
        .stderr()
        .read_to_end(&mut stderr)
        .map_err(|e| map_io_error(e, "SSH stderr read failed", timeout))?;

    channel
        .wait_close()
        .map_err(|e| map_ssh_error(e, "SSH channel close failed", timeout))?;
    let exit_status = channel.exit_status().ok();

    Ok(ExecOutput {
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        exit_status,
    })
}

#[async_trait::async_trait]
impl Transport for SshTransport {
    async fn connect(
        &mut self,
        host: &str,
        port: u16,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let host = host.to_string();
        let username = credentials.username().as_str().to_string();
        let password = credentials.secret().clone();

        let sess = tokio::task::spawn_blocking(move || {
            handshake(&host, port, &username, password.as_str(), timeout)
        })
        .await
        .map_err(|e| SessionError::Transport(format!("SSH task failed: {e}")))??;

        self.session = Some(sess);
        Ok(())
    }

    async fn exec(&mut self, command: &str, timeout: Duration) -> Result<ExecOutput, SessionError> {
        // ssh2::Session is a shared handle; the clone drives the same connection
        let sess = self.session.clone().ok_or(SessionError::NotConnected)?;
        let command = command.to_string();

        tokio::task::spawn_blocking(move || exec_blocking(&sess, &command, timeout))
            .await
            .map_err(|e| SessionError::Transport(format!("SSH task failed: {e}")))?
    }

    async fn close(&mut self) {
        let Some(sess) = self.session.take() else {
            return;
        };
        let result = tokio::task::spawn_blocking(move || {
            sess.set_timeout(timeout_ms(Duration::from_secs(5)));
            sess.disconnect(None, "closing", None)
        })
        .await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!(error = %e, "SSH disconnect reported an error"),
            Err(e) => tracing::warn!(error = %e, "SSH disconnect task failed"),
        }
    }
}
