//! Diagnostic logging setup.
//!
//! Library code emits `tracing` events; the binary installs a subscriber
//! that writes them to stderr so they never mix with echoed child output on
//! stdout. The filter comes from `EXECPROC_LOG` (default `warn`).

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "EXECPROC_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Calling it again is a no-op.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    let filter = std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(fmt_layer)
        .try_init();
}
