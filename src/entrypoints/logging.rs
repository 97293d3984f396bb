//! Logging initialization for the native host.
//!
//! Android logs through `android_logger` instead, see [`super::android`].

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Directives used when `RUST_LOG` is unset or invalid.
pub fn default_directives() -> &'static str {
    if cfg!(debug_assertions) {
        "debug,embedded_view_bridge::view::frame_loop=info"
    } else {
        "info"
    }
}

/// Installs the global `tracing` subscriber. Later calls are ignored.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives()));
    let fmt_layer = fmt::layer().with_filter(filter);

    if tracing_subscriber::registry().with(fmt_layer).try_init().is_ok() {
        tracing::debug!(
            profiling = cfg!(feature = "profiling"),
            "Logging initialized"
        );
    }
}
