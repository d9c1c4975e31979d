//! Ordered, paced execution of a command list against one session
//!
//! Every command is attempted exactly once, in input order, and contributes
//! exactly one [`CommandResult`]. A failed command never stops the batch.
//! The runner neither opens nor closes the session.

use super::executor::{run_command, CommandResult};
use super::session::Session;
use crate::constants::{DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_INTER_COMMAND_DELAY_SECS};
use crate::utils::SessionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Results of one batch, one entry per input command in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub started_at: DateTime<Utc>,
    pub total_duration_seconds: f64,
    pub results: Vec<CommandResult>,
}

impl BatchResult {
    /// Batch with no commands, used when nothing could run
    pub fn empty() -> Self {
        Self {
            started_at: Utc::now(),
            total_duration_seconds: 0.0,
            results: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn successful(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.successful()
    }
}

/// Drives the executor over a command list with a fixed pause between commands
#[derive(Debug, Clone)]
pub struct BatchRunner {
    inter_command_delay: Option<Duration>,
    command_timeout: Duration,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(
            DEFAULT_INTER_COMMAND_DELAY_SECS,
            Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS),
        )
    }
}

impl BatchRunner {
    /// `inter_command_delay_secs` of zero, negative or non-finite disables
    /// pacing. A delay too large for a [`Duration`] also disables it.
    pub fn new(inter_command_delay_secs: f64, command_timeout: Duration) -> Self {
        let inter_command_delay = if inter_command_delay_secs.is_finite()
            && inter_command_delay_secs > 0.0
        {
            match Duration::try_from_secs_f64(inter_command_delay_secs) {
                Ok(delay) => Some(delay),
                Err(e) => {
                    tracing::warn!(
                        delay_secs = inter_command_delay_secs,
                        error = %e,
                        "inter-command delay out of range, pacing disabled"
                    );
                    None
                }
            }
        } else {
            None
        };

        Self {
            inter_command_delay,
            command_timeout,
        }
    }

    pub fn inter_command_delay(&self) -> Option<Duration> {
        self.inter_command_delay
    }

    /// Execute `commands` in order on `session`
    ///
    /// # Errors
    ///
    /// [`SessionError::NotConnected`] if the session is not open. Remote
    /// failures are recorded in the per-command results instead.
    pub async fn run_all<S: AsRef<str>>(
        &self,
        session: &mut Session,
        commands: &[S],
    ) -> Result<BatchResult, SessionError> {
        if !session.is_open() {
            return Err(SessionError::NotConnected);
        }

        tracing::info!(
            host = %session.host(),
            commands = commands.len(),
            delay_secs = self.inter_command_delay.map(|d| d.as_secs_f64()).unwrap_or(0.0),
            "running command batch"
        );

        let started_at = Utc::now();
        let clock = Instant::now();
        let mut results = Vec::with_capacity(commands.len());

        for (index, command) in commands.iter().enumerate() {
            if index > 0 {
                if let Some(delay) = self.inter_command_delay {
                    tokio::time::sleep(delay).await;
                }
            }
            results.push(run_command(session, command.as_ref(), self.command_timeout).await?);
        }

        let batch = BatchResult {
            started_at,
            total_duration_seconds: clock.elapsed().as_secs_f64(),
            results,
        };

        tracing::info!(
            host = %session.host(),
            successful = batch.successful(),
            total = batch.len(),
            total_duration_seconds = batch.total_duration_seconds,
            "command batch finished"
        );
        Ok(batch)
    }
}
