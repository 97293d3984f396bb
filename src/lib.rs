//! Embedded View Bridge
//!
//! Binds a mobile host shell's lifecycle (create, resume, pause, destroy) to an
//! embedded runtime that schedules its own frames. The host only starts and
//! stops the runtime's loop; it never drives frames itself.
//!
//! # Architecture
//!
//! - **[`RuntimeContextRegistry`]**: write-once registration of the
//!   [`ExecutionContext`] the runtime needs before any call into it
//! - **[`LifecycleBridge`]**: state machine issuing resume/suspend signals to the
//!   embedded view, filtering out redundant and invalid transitions
//! - **[`view`]**: the capabilities the bridge consumes ([`EmbeddedView`],
//!   [`ViewLocator`]), an in-process [`ViewTree`] and a headless
//!   [`FrameLoopView`]

pub mod bridge;
pub mod context;
mod entrypoints;
pub mod settings;
pub mod view;

pub use bridge::{BridgeState, LifecycleBridge, LifecycleEvent, SignalCounts};
pub use context::{ExecutionContext, RuntimeContextRegistry};
pub use entrypoints::run::{HostReport, native_main, run_host};
pub use view::{
    EmbeddedView, FrameInfo, FrameLoopConfig, FrameLoopView, Game, GameError, TreeLocator,
    ViewId, ViewLocator, ViewTree,
};

/// Precondition a lifecycle call depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Precondition {
    #[error("execution context has not been registered")]
    ContextNotRegistered,

    #[error("execution context is already registered")]
    ContextAlreadyRegistered,

    #[error("lifecycle bridge has been torn down")]
    TornDown,
}

/// Error types for lifecycle transitions.
///
/// Both variants are construction-order defects in the host: they are returned
/// to the caller of the lifecycle hook and never retried.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("precondition violated: {0}")]
    PreconditionViolation(Precondition),

    #[error("embedded view `{id}` is not present in the view tree")]
    ViewResolution { id: ViewId },
}

pub type Result<T> = std::result::Result<T, BridgeError>;

// Entry point for Android
#[cfg(target_os = "android")]
#[unsafe(no_mangle)] // SAFETY: there is no other global function of this name
fn android_main(app: winit::platform::android::activity::AndroidApp) {
    entrypoints::android::android_main(app);
}
