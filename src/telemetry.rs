//! Logging setup
//!
//! Logs go to stderr so stdout stays reserved for the account snapshot.
//! The filter is read from `RUST_LOG` and defaults to `warn`, which reports
//! rejected commands and skipped rows but not successful operations.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

/// Install the global tracing subscriber
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
