//! Tracing subscriber setup for hosts that do not install their own.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `yardmap=debug`.
pub const LOG_ENV: &str = "YARDMAP_LOG";

/// Install a formatted subscriber filtered by `YARDMAP_LOG` (default `info`).
/// Does nothing if a global subscriber is already set.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
