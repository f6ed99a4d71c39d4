//! Tracing setup for binaries embedding the application layer.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the global tracing subscriber.
///
/// Respects `RUST_LOG` when set and falls back to debug-level output for
/// this application's crates. Call once at process start.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finledger=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
