//! Embedded view capabilities.
//!
//! The bridge never owns the on-screen view that hosts the embedded runtime. It
//! sees two capabilities instead:
//! - [`EmbeddedView`]: the start/stop control surface of the runtime's view
//! - [`ViewLocator`]: a synchronous lookup returning the *current* view
//!
//! [`ViewTree`] is an in-process view tree implementing the lookup. Hosts may
//! tear it down and rebuild it at any time without telling the bridge.

pub mod frame_loop;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use crate::{BridgeError, Result};

pub use frame_loop::{FrameInfo, FrameLoopConfig, FrameLoopView, Game, GameError};

/// Identifier of a view inside a [`ViewTree`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewId(String);

impl ViewId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Control surface of the view hosting the embedded runtime.
///
/// `resume` and `suspend` are fire-and-forget: they flip the runtime's run flag
/// and return without waiting for its frame loop. Implementations are not
/// required to tolerate redundant calls; the bridge filters those out.
pub trait EmbeddedView: Send + Sync {
    fn id(&self) -> &ViewId;

    fn resume(&self);

    fn suspend(&self);

    fn is_running(&self) -> bool;
}

/// Looks up the embedded view in whatever view tree currently exists.
pub trait ViewLocator {
    fn resolve_view(&self) -> Result<Arc<dyn EmbeddedView>>;
}

impl<F> ViewLocator for F
where
    F: Fn() -> Result<Arc<dyn EmbeddedView>>,
{
    fn resolve_view(&self) -> Result<Arc<dyn EmbeddedView>> {
        self()
    }
}

/// Host-side view tree owning the embedded views.
#[derive(Default)]
pub struct ViewTree {
    views: RwLock<HashMap<ViewId, Arc<dyn EmbeddedView>>>,
}

impl ViewTree {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Adds `view`, replacing any view already attached under the same id.
    pub fn attach(&self, view: Arc<dyn EmbeddedView>) {
        let id = view.id().clone();
        tracing::debug!(view = %id, "Attaching view");
        self.write().insert(id, view);
    }

    pub fn detach(&self, id: &ViewId) -> Option<Arc<dyn EmbeddedView>> {
        tracing::debug!(view = %id, "Detaching view");
        self.write().remove(id)
    }

    /// Tears the whole tree down.
    pub fn clear(&self) {
        let mut views = self.write();
        tracing::debug!(count = views.len(), "Tearing down view tree");
        views.clear();
    }

    pub fn find(&self, id: &ViewId) -> Option<Arc<dyn EmbeddedView>> {
        self.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A locator resolving `id` in this tree on every call.
    ///
    /// The locator holds only a weak reference, so it never keeps a torn-down
    /// tree alive.
    pub fn locator(self: &Arc<Self>, id: impl Into<ViewId>) -> TreeLocator {
        TreeLocator {
            tree: Arc::downgrade(self),
            id: id.into(),
        }
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still usable.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ViewId, Arc<dyn EmbeddedView>>> {
        self.views.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ViewId, Arc<dyn EmbeddedView>>> {
        self.views.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// [`ViewLocator`] backed by a [`ViewTree`].
#[derive(Clone)]
pub struct TreeLocator {
    tree: Weak<ViewTree>,
    id: ViewId,
}

impl TreeLocator {
    pub fn id(&self) -> &ViewId {
        &self.id
    }
}

impl ViewLocator for TreeLocator {
    fn resolve_view(&self) -> Result<Arc<dyn EmbeddedView>> {
        self.tree
            .upgrade()
            .and_then(|tree| tree.find(&self.id))
            .ok_or_else(|| BridgeError::ViewResolution {
                id: self.id.clone(),
            })
    }
}
