//! Tracing subscriber setup
//!
//! The library only emits `tracing` events; binaries embedding it call
//! [`init_logger`] once (repeat calls are no-ops).

use tracing_subscriber::EnvFilter;

const LOG_FILTER_ENV: &str = "NETPROBE_LOG";
const LOG_VERBOSE_ENV: &str = "NETPROBE_LOG_VERBOSE";

/// Filter directive used when neither `NETPROBE_LOG` nor `RUST_LOG` is set
fn default_directive() -> &'static str {
    let verbose = std::env::var(LOG_VERBOSE_ENV)
        .map(|v| v == "1")
        .unwrap_or(false);

    if verbose || cfg!(debug_assertions) {
        "netprobe=debug,info"
    } else {
        "info"
    }
}

fn build_filter() -> EnvFilter {
    std::env::var(LOG_FILTER_ENV)
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive()))
}

/// Install a formatted stderr subscriber. Safe to call more than once.
pub fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_logger();
        init_logger();
        tracing::info!("logger initialised twice without panicking");
    }
}
