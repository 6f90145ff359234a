//! Logging and tracing utilities

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Honors `RUST_LOG` when set; defaults to `info` otherwise.
pub fn init_tracing() {
    init_tracing_with_default("info");
}

/// Initialize the tracing subscriber with an explicit default directive
/// used when `RUST_LOG` is unset.
pub fn init_tracing_with_default(directive: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
