//! Health scoring: reduces a batch to a percentage and a three-tier verdict

use super::batch::BatchResult;
use crate::constants::{DEGRADED_SCORE_THRESHOLD, HEALTHY_SCORE_THRESHOLD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Tier for a score. Lower bounds are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= HEALTHY_SCORE_THRESHOLD {
            HealthStatus::Healthy
        } else if score >= DEGRADED_SCORE_THRESHOLD {
            HealthStatus::Degraded
        } else {
            HealthStatus::Unhealthy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Graded verdict for one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    /// Percentage of commands that exited 0, two decimals
    pub score: f64,
    pub commands_executed: usize,
    pub successful_commands: usize,
    pub failed_commands: usize,
    pub connection_succeeded: bool,
    pub connection_message: String,
    pub summary: String,
    pub checked_at: DateTime<Utc>,
    pub details: BatchResult,
}

/// `round(100 * successful / executed, 2)`, or `None` when nothing ran
pub fn health_score(successful: usize, executed: usize) -> Option<f64> {
    if executed == 0 {
        return None;
    }
    let raw = 100.0 * successful as f64 / executed as f64;
    Some((raw * 100.0).round() / 100.0)
}

/// Reduce a connection outcome and its batch to a [`HealthReport`]
///
/// A failed connection yields `unhealthy` with score 0 and no details. A
/// connected session whose batch ran nothing has no defined score and is
/// reported the same way.
pub fn evaluate(
    connection_succeeded: bool,
    connection_message: &str,
    batch: Option<BatchResult>,
) -> HealthReport {
    let checked_at = Utc::now();

    let batch = match (connection_succeeded, batch) {
        (true, Some(batch)) if !batch.is_empty() => batch,
        (succeeded, batch) => {
            let summary = if succeeded {
                "UNHEALTHY - no commands executed".to_string()
            } else {
                format!("UNHEALTHY - connection failed: {connection_message}")
            };
            return HealthReport {
                status: HealthStatus::Unhealthy,
                score: 0.0,
                commands_executed: 0,
                successful_commands: 0,
                failed_commands: 0,
                connection_succeeded: succeeded,
                connection_message: connection_message.to_string(),
                summary,
                checked_at,
                details: if succeeded {
                    batch.unwrap_or_else(BatchResult::empty)
                } else {
                    BatchResult::empty()
                },
            };
        }
    };

    let executed = batch.len();
    let successful = batch.successful();
    let score = health_score(successful, executed).unwrap_or(0.0);
    let status = HealthStatus::from_score(score);

    HealthReport {
        status,
        score,
        commands_executed: executed,
        successful_commands: successful,
        failed_commands: executed - successful,
        connection_succeeded: true,
        connection_message: connection_message.to_string(),
        summary: format!(
            "{} - {}% ({}/{} commands successful)",
            status.as_str().to_uppercase(),
            score,
            successful,
            executed
        ),
        checked_at,
        details: batch,
    }
}
