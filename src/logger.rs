use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_DIRECTIVES: &str = "mdsweep=info,tower_http=info";

/// Installs the global subscriber. `log` records are bridged into it.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
