//! Opt-in retry with exponential backoff
//!
//! Sessions and the command executor never retry on their own. This wrapper
//! exists for callers that want a bounded number of reconnect attempts around
//! opening a session.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the initial attempt)
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Single attempt, fail fast
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// Bounded attempts with the default backoff curve
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    fn next_delay(&self, current: Duration) -> Duration {
        let next_ms = (current.as_millis() as f64 * self.backoff_multiplier) as u64;
        let base = Duration::from_millis(next_ms).min(self.max_delay);

        // +/-20% jitter so many callers failing together do not reconnect in lockstep
        let jitter = rand::thread_rng().gen_range(0.8..=1.2);
        Duration::from_millis((base.as_millis() as f64 * jitter) as u64)
    }
}

/// Retry an async operation with exponential backoff
///
/// `operation` is invoked once, then up to `config.max_retries` more times
/// while `is_retryable` approves the error.
///
/// ```ignore
/// let result = retry_with_backoff(
///     RetryConfig::with_max_retries(3),
///     || async { open_session("10.0.0.1").await },
///     |err: &String| is_transient_error(err),
/// )
/// .await;
/// ```
pub async fn retry_with_backoff<T, E, F, Fut, P>(
    config: RetryConfig,
    mut operation: F,
    is_retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                attempt += 1;
                if attempt > config.max_retries || !is_retryable(&err) {
                    return Err(err);
                }

                tracing::warn!(
                    attempt,
                    max_attempts = config.max_retries + 1,
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "attempt failed, retrying"
                );

                sleep(delay).await;
                delay = config.next_delay(delay);
            }
        }
    }
}

/// Determines whether a connection error message describes a transient fault
///
/// Timeouts, refusals, resets and resolution hiccups are retryable.
/// Authentication and permission failures never are. Unknown messages
/// default to non-retryable.
pub fn is_transient_error(error_msg: &str) -> bool {
    let lowercase = error_msg.to_lowercase();

    let non_retryable_patterns = [
        "authentication failed",
        "access denied",
        "permission denied",
        "invalid credentials",
        "unauthorized",
    ];

    let retryable_patterns = [
        "timeout",
        "timed out",
        "connection refused",
        "connection reset",
        "network unreachable",
        "no route to host",
        "host is down",
        "broken pipe",
        "temporarily unavailable",
        "could not resolve",
        "name resolution",
    ];

    if non_retryable_patterns.iter().any(|p| lowercase.contains(p)) {
        return false;
    }

    retryable_patterns.iter().any(|p| lowercase.contains(p))
}
