#![allow(dead_code)] // Allow auto-generated code containing unused build metadata

use shadow_rs::shadow;

shadow!(build);

/// Logs the build metadata once at startup.
///
/// On Android the event reaches logcat through tracing's `log` bridge.
pub fn log_version_info() {
    tracing::info!(
        built = build::BUILD_TIME_2822,
        channel = build::BUILD_RUST_CHANNEL,
        "{}",
        short_version_info()
    );
}

pub fn short_version_info() -> String {
    format!(
        "{} {} ({}@{}{})",
        build::PROJECT_NAME,
        build::PKG_VERSION,
        build::BRANCH,
        build::SHORT_COMMIT,
        if build::GIT_CLEAN { "" } else { "+dirty" }
    )
}
