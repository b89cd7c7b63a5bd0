use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the fmt subscriber. Honors `RUST_LOG`, defaulting to `info`.
/// Only the first call has effect.
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
            eprintln!("[telemetry] a global subscriber is already installed");
        }
    });
}
