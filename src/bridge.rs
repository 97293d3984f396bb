//! Host lifecycle to embedded runtime bridge.
//!
//! [`LifecycleBridge`] turns host visibility events into resume/suspend signals
//! for the embedded view. It keeps the runtime's frame loop stopped while the
//! host surface is hidden and makes sure redundant events never reach the view:
//!
//! | Event           | From                  | Signal    | To         |
//! |-----------------|-----------------------|-----------|------------|
//! | `on_foreground` | `Created`/`Suspended` | `resume`  | `Running`  |
//! | `on_foreground` | `Running`             | -         | `Running`  |
//! | `on_background` | `Running`             | `suspend` | `Suspended`|
//! | `on_background` | `Created`/`Suspended` | -         | `Suspended`|
//! | `teardown`      | any                   | -         | `Destroyed`|
//!
//! The view is looked up through the [`ViewLocator`] on every transition that
//! signals it, never cached, because the host may rebuild its view tree between
//! a background and the following foreground.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::context::RuntimeContextRegistry;
use crate::view::ViewLocator;
use crate::{BridgeError, Precondition, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Created,
    Running,
    Suspended,
    Destroyed,
}

impl fmt::Display for BridgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Suspended => "suspended",
            Self::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// Host lifecycle event, as delivered by the platform or a scripted host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Foreground,
    Background,
    Teardown,
}

impl FromStr for LifecycleEvent {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fg" | "foreground" | "resume" => Ok(Self::Foreground),
            "bg" | "background" | "pause" => Ok(Self::Background),
            "destroy" | "teardown" => Ok(Self::Teardown),
            other => Err(format!(
                "unknown lifecycle event `{other}` (expected fg, bg or destroy)"
            )),
        }
    }
}

/// Signals issued to the embedded view so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalCounts {
    pub resumes: u64,
    pub suspends: u64,
}

pub struct LifecycleBridge<L: ViewLocator> {
    registry: Arc<RuntimeContextRegistry>,
    locator: Option<L>,
    state: BridgeState,
    signals: SignalCounts,
}

impl<L: ViewLocator> LifecycleBridge<L> {
    /// Creates the bridge once the host page exists and its view can be located.
    pub fn new(registry: Arc<RuntimeContextRegistry>, locator: L) -> Self {
        Self {
            registry,
            locator: Some(locator),
            state: BridgeState::Created,
            signals: SignalCounts::default(),
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn signals(&self) -> SignalCounts {
        self.signals
    }

    /// The host surface became visible: start the embedded frame loop.
    ///
    /// Fails without signalling anything if the execution context was never
    /// registered, the bridge was torn down, or the view cannot be found. The
    /// state is left unchanged on failure.
    #[profiling::function]
    pub fn on_foreground(&mut self) -> Result<()> {
        let locator = self.live_locator()?;
        if self.state == BridgeState::Running {
            tracing::debug!("Foreground while already running, ignoring");
            return Ok(());
        }

        self.registry.require()?;
        let view = locator.resolve_view().inspect_err(|err| {
            tracing::error!(state = %self.state, "Cannot resume embedded view: {err}");
        })?;

        view.resume();
        self.signals.resumes += 1;
        tracing::info!(view = %view.id(), from = %self.state, "Embedded view resumed");
        self.state = BridgeState::Running;
        Ok(())
    }

    /// The host surface was hidden: stop the embedded frame loop.
    ///
    /// Fails, staying `Running`, if the view cannot be found while running.
    #[profiling::function]
    pub fn on_background(&mut self) -> Result<()> {
        let locator = self.live_locator()?;
        if self.state != BridgeState::Running {
            tracing::debug!(state = %self.state, "Background with nothing running, ignoring");
            self.state = BridgeState::Suspended;
            return Ok(());
        }

        // A view missing from the tree may still be alive and ticking, so the
        // bridge cannot claim it stopped.
        let view = locator.resolve_view().inspect_err(|err| {
            tracing::error!(state = %self.state, "Cannot suspend embedded view: {err}");
        })?;

        view.suspend();
        self.signals.suspends += 1;
        tracing::info!(view = %view.id(), "Embedded view suspended");
        self.state = BridgeState::Suspended;
        Ok(())
    }

    /// Releases the view locator. Any later event is a precondition violation.
    ///
    /// Does not wait for frames in flight and does not signal the view.
    pub fn teardown(&mut self) {
        if self.locator.take().is_some() {
            tracing::info!(from = %self.state, "Lifecycle bridge torn down");
        }
        self.state = BridgeState::Destroyed;
    }

    pub fn dispatch(&mut self, event: LifecycleEvent) -> Result<()> {
        match event {
            LifecycleEvent::Foreground => self.on_foreground(),
            LifecycleEvent::Background => self.on_background(),
            LifecycleEvent::Teardown => {
                self.teardown();
                Ok(())
            }
        }
    }

    fn live_locator(&self) -> Result<&L> {
        self.locator.as_ref().ok_or_else(|| {
            tracing::error!("Lifecycle event after teardown");
            BridgeError::PreconditionViolation(Precondition::TornDown)
        })
    }
}
