//! Probe operations against a single device
//!
//! Each operation opens its own [`Session`], runs its commands, and closes
//! the session on every exit path before returning. Sessions are never shared
//! between operations.
//!
//! # Example
//!
//! ```ignore
//! use netprobe::{Credentials, Device, Probe, ProbeConfig};
//!
//! let probe = Probe::new(ProbeConfig::from_env());
//! let device = Device::new(1, "edge-rtr-01", "10.0.0.1", "cisco_ios");
//! let creds = Credentials::from_parts("admin", "secret", None)?;
//!
//! let report = probe.health_check(&device, &creds).await?;
//! println!("{}", report.summary);
//! ```

use super::batch::{BatchResult, BatchRunner};
use super::executor::{run_command, CommandResult};
use super::health::{evaluate, HealthReport};
use super::registry::DeviceRegistry;
use super::session::{ConnectionOutcome, Connector, Session};
use crate::config::ProbeConfig;
use crate::constants::MAX_CONNECTION_TEST_COMMANDS;
use crate::models::{Credentials, Device};
use crate::normalize::normalize_host;
use crate::platform::SshConnector;
use crate::utils::{retry_with_backoff, ProbeError, RetryConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Result of a connectivity smoke test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionTestReport {
    pub device: Device,
    pub username: String,
    pub port: u16,
    pub connection: ConnectionOutcome,
    /// Test commands that ran; absent when the connection failed
    pub tests: Option<BatchResult>,
    pub total_tests: usize,
    pub successful_tests: usize,
    pub message: String,
    pub tested_at: DateTime<Utc>,
}

/// Named commands available for a device (no connection involved)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandCatalog {
    pub device: Device,
    pub available_commands: BTreeMap<String, String>,
    pub commands_count: usize,
}

/// Entry point for the probe flows
pub struct Probe {
    config: ProbeConfig,
    connector: Arc<dyn Connector>,
    retry: RetryConfig,
    registry: &'static DeviceRegistry,
}

impl Probe {
    /// Probe over real SSH transports, single connection attempt
    pub fn new(config: ProbeConfig) -> Self {
        Self::with_connector(config, Arc::new(SshConnector))
    }

    pub fn with_connector(config: ProbeConfig, connector: Arc<dyn Connector>) -> Self {
        Self {
            config,
            connector,
            retry: RetryConfig::no_retry(),
            registry: DeviceRegistry::global(),
        }
    }

    /// Retry transient connection failures. Commands are never retried.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub fn registry(&self) -> &DeviceRegistry {
        self.registry
    }

    /// Open a fresh session, retrying per `self.retry`. Sessions from failed
    /// attempts are closed before the next attempt.
    async fn open_session(
        &self,
        host: &str,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<(Session, ConnectionOutcome), ConnectionOutcome> {
        retry_with_backoff(
            self.retry.clone(),
            || async move {
                let mut session = Session::new(host, self.connector.transport());
                let outcome = session.open(credentials, timeout).await;
                if outcome.success {
                    Ok((session, outcome))
                } else {
                    session.close().await;
                    Err(outcome)
                }
            },
            ConnectionOutcome::is_transient,
        )
        .await
    }

    fn runner(&self, delay_secs: f64) -> BatchRunner {
        BatchRunner::new(delay_secs, self.config.command_timeout())
    }

    /// Connect and run up to three of the device type's test commands
    pub async fn test_connection(
        &self,
        device: &Device,
        credentials: &Credentials,
    ) -> Result<ConnectionTestReport, ProbeError> {
        let host = normalize_host(&device.address)?;
        let commands: Vec<String> = self
            .registry
            .test_commands_for(&device.device_type)
            .into_iter()
            .take(MAX_CONNECTION_TEST_COMMANDS)
            .collect();

        tracing::info!(
            device = %device.name,
            host = %host,
            user = %credentials.username(),
            "testing SSH connection"
        );

        let runner = self.runner(self.config.delay_for(&device.device_type));
        let (connection, tests) = match self
            .open_session(&host, credentials, self.config.test_connect_timeout())
            .await
        {
            Err(outcome) => (outcome, None),
            Ok((mut session, outcome)) => {
                let batch = runner.run_all(&mut session, &commands).await;
                session.close().await;
                (outcome, Some(batch?))
            }
        };

        let total_tests = tests.as_ref().map_or(0, BatchResult::len);
        let successful_tests = tests.as_ref().map_or(0, BatchResult::successful);
        let message = if connection.success {
            format!("SSH connection successful - {successful_tests}/{total_tests} tests passed")
        } else {
            tracing::warn!(device = %device.name, "{}", connection.message);
            format!("SSH connection failed: {}", connection.message)
        };

        Ok(ConnectionTestReport {
            device: device.clone(),
            username: credentials.username().to_string(),
            port: credentials.port(),
            connection,
            tests,
            total_tests,
            successful_tests,
            message,
            tested_at: Utc::now(),
        })
    }

    /// Run one command
    pub async fn execute(
        &self,
        device: &Device,
        credentials: &Credentials,
        command: &str,
    ) -> Result<CommandResult, ProbeError> {
        let host = normalize_host(&device.address)?;
        let (mut session, _) = self
            .open_session(&host, credentials, self.config.connect_timeout())
            .await
            .map_err(ProbeError::Connection)?;

        let result = run_command(&mut session, command, self.config.command_timeout()).await;
        session.close().await;
        Ok(result?)
    }

    /// Run `commands` in order. `delay_secs` overrides the configured pacing.
    pub async fn execute_batch<S: AsRef<str>>(
        &self,
        device: &Device,
        credentials: &Credentials,
        commands: &[S],
        delay_secs: Option<f64>,
    ) -> Result<BatchResult, ProbeError> {
        let host = normalize_host(&device.address)?;
        let delay = delay_secs.unwrap_or_else(|| self.config.delay_for(&device.device_type));
        let runner = self.runner(delay);
        let (mut session, _) = self
            .open_session(&host, credentials, self.config.connect_timeout())
            .await
            .map_err(ProbeError::Connection)?;

        let batch = runner.run_all(&mut session, commands).await;
        session.close().await;
        Ok(batch?)
    }

    /// Run the device type's health commands and grade the outcome
    ///
    /// Connection failures produce an `unhealthy` report, not an error.
    pub async fn health_check(
        &self,
        device: &Device,
        credentials: &Credentials,
    ) -> Result<HealthReport, ProbeError> {
        let host = normalize_host(&device.address)?;
        let commands = self.registry.health_commands_for(&device.device_type);
        tracing::info!(
            device = %device.name,
            device_type = %device.device_type,
            commands = commands.len(),
            "health check"
        );

        let runner = self.runner(self.config.delay_for(&device.device_type));
        let report = match self
            .open_session(&host, credentials, self.config.health_connect_timeout())
            .await
        {
            Err(outcome) => evaluate(false, &outcome.message, None),
            Ok((mut session, outcome)) => {
                let batch = runner.run_all(&mut session, &commands).await;
                session.close().await;
                evaluate(true, &outcome.message, Some(batch?))
            }
        };

        tracing::info!(
            device = %device.name,
            status = %report.status,
            score = report.score,
            "health check completed"
        );
        Ok(report)
    }

    /// Collect version/interface/identity output using the registry's info commands
    pub async fn quick_info(
        &self,
        device: &Device,
        credentials: &Credentials,
    ) -> Result<BatchResult, ProbeError> {
        let commands = self.registry.info_commands_for(&device.device_type);
        self.execute_batch(device, credentials, &commands, None).await
    }

    /// Named command catalog for the device's type
    pub fn available_commands(&self, device: &Device) -> CommandCatalog {
        let available_commands = self.registry.commands_for(&device.device_type);
        CommandCatalog {
            device: device.clone(),
            commands_count: available_commands.len(),
            available_commands,
        }
    }
}
