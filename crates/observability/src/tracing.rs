//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process with the `info` default.
///
/// Safe to call multiple times (subsequent calls are no-ops), so propagation
/// tests and the admin service can both call it unconditionally.
pub fn init() {
    init_with_default_filter("info");
}

/// Initialize with an explicit fallback filter, still overridable via
/// `RUST_LOG`. Propagation runs log one line per failed product write, so
/// batch tooling may want `warn` here.
pub fn init_with_default_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // JSON lines with timestamps; targets add no signal in a workspace this size.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
