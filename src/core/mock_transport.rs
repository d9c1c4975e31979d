//! Scripted transport for testing without real devices
//!
//! Connect and exec outcomes are scripted up front; a shared [`MockHandle`]
//! records what the code under test actually did (connects, closes, the
//! commands sent and when they were sent).

use super::session::{Connector, ExecOutput, Transport};
use crate::models::Credentials;
use crate::utils::SessionError;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Scripted result of a connect attempt
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Succeed,
    AuthFailure,
    TransportFailure(String),
    /// Never completes; the caller's timeout must fire
    Hang,
}

/// Scripted result of one exec
#[derive(Debug, Clone)]
pub enum MockReply {
    Exit {
        stdout: String,
        stderr: String,
        status: Option<i32>,
    },
    TransportError(String),
    Hang,
}

impl MockReply {
    pub fn ok(stdout: &str) -> Self {
        Self::Exit {
            stdout: stdout.to_string(),
            stderr: String::new(),
            status: Some(0),
        }
    }

    pub fn exit(status: i32, stdout: &str, stderr: &str) -> Self {
        Self::Exit {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            status: Some(status),
        }
    }
}

#[derive(Default)]
struct MockState {
    connect_calls: usize,
    close_calls: usize,
    executed: Vec<(String, Instant)>,
    connect_script: VecDeque<MockBehavior>,
}

/// Read side of a mock's shared record
#[derive(Clone)]
pub struct MockHandle(Arc<Mutex<MockState>>);

impl MockHandle {
    pub fn connect_calls(&self) -> usize {
        self.0.lock().unwrap().connect_calls
    }

    pub fn close_calls(&self) -> usize {
        self.0.lock().unwrap().close_calls
    }

    pub fn executed(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .executed
            .iter()
            .map(|(cmd, _)| cmd.clone())
            .collect()
    }

    /// Instants at which each command reached the transport
    pub fn exec_instants(&self) -> Vec<Instant> {
        self.0
            .lock()
            .unwrap()
            .executed
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }
}

/// Scripted transport; clones share one record
#[derive(Clone)]
pub struct MockTransport {
    connect: MockBehavior,
    replies: HashMap<String, MockReply>,
    default_reply: MockReply,
    connected: bool,
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Connects successfully and answers every command with exit status 0
    pub fn new() -> Self {
        Self {
            connect: MockBehavior::Succeed,
            replies: HashMap::new(),
            default_reply: MockReply::ok("ok"),
            connected: false,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    pub fn with_connect(mut self, behavior: MockBehavior) -> Self {
        self.connect = behavior;
        self
    }

    /// Outcomes for successive connect attempts across all clones, before
    /// falling back to the `with_connect` behavior
    pub fn with_connect_sequence(self, behaviors: Vec<MockBehavior>) -> Self {
        self.state.lock().unwrap().connect_script = behaviors.into();
        self
    }

    pub fn with_reply(mut self, command: &str, reply: MockReply) -> Self {
        self.replies.insert(command.to_string(), reply);
        self
    }

    pub fn with_default_reply(mut self, reply: MockReply) -> Self {
        self.default_reply = reply;
        self
    }

    pub fn handle(&self) -> MockHandle {
        MockHandle(Arc::clone(&self.state))
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn connect(
        &mut self,
        _host: &str,
        _port: u16,
        credentials: &Credentials,
        _timeout: Duration,
    ) -> Result<(), SessionError> {
        let behavior = {
            let mut state = self.state.lock().unwrap();
            state.connect_calls += 1;
            state
                .connect_script
                .pop_front()
                .unwrap_or_else(|| self.connect.clone())
        };

        match behavior {
            MockBehavior::Succeed => {
                self.connected = true;
                Ok(())
            }
            MockBehavior::AuthFailure => Err(SessionError::Authentication(format!(
                "password rejected for {}",
                credentials.username()
            ))),
            MockBehavior::TransportFailure(msg) => Err(SessionError::Transport(msg)),
            MockBehavior::Hang => std::future::pending().await,
        }
    }

    async fn exec(&mut self, command: &str, _timeout: Duration) -> Result<ExecOutput, SessionError> {
        if !self.connected {
            return Err(SessionError::NotConnected);
        }
        self.state
            .lock()
            .unwrap()
            .executed
            .push((command.to_string(), Instant::now()));

        let reply = self
            .replies
            .get(command)
            .cloned()
            .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            MockReply::Exit {
                stdout,
                stderr,
                status,
            } => Ok(ExecOutput {
                stdout,
                stderr,
                exit_status: status,
            }),
            MockReply::TransportError(msg) => Err(SessionError::Transport(msg)),
            MockReply::Hang => std::future::pending().await,
        }
    }

    async fn close(&mut self) {
        self.connected = false;
        self.state.lock().unwrap().close_calls += 1;
    }
}

/// Connector handing out clones of one scripted transport
pub struct MockConnector(pub MockTransport);

impl Connector for MockConnector {
    fn transport(&self) -> Box<dyn Transport> {
        let mut transport = self.0.clone();
        transport.connected = false;
        Box::new(transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_commands() {
        let mut mock = MockTransport::new().with_reply("false", MockReply::exit(1, "", ""));
        let handle = mock.handle();
        let creds = Credentials::from_parts("u", "p", None).unwrap();

        mock.connect("h", 22, &creds, Duration::from_secs(1))
            .await
            .unwrap();
        let out = mock.exec("false", Duration::from_secs(1)).await.unwrap();
        assert_eq!(out.exit_status, Some(1));
        assert_eq!(handle.executed(), vec!["false".to_string()]);
    }

    #[tokio::test]
    async fn test_connect_sequence_is_shared_between_clones() {
        let template = MockTransport::new().with_connect_sequence(vec![
            MockBehavior::TransportFailure("Connection refused".to_string()),
        ]);
        let handle = template.handle();
        let connector = MockConnector(template);
        let creds = Credentials::from_parts("u", "p", None).unwrap();

        let mut first = connector.transport();
        let mut second = connector.transport();
        assert!(first.connect("h", 22, &creds, Duration::from_secs(1)).await.is_err());
        assert!(second.connect("h", 22, &creds, Duration::from_secs(1)).await.is_ok());
        assert_eq!(handle.connect_calls(), 2);
    }
}
