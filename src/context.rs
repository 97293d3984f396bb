//! Execution context registration.
//!
//! The embedded runtime needs a handle to platform resources (storage paths,
//! assets) before any call into it can succeed. The host builds one
//! [`ExecutionContext`] at page creation and publishes it exactly once through a
//! [`RuntimeContextRegistry`]; every later reader gets a shared, immutable view.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};

use crate::{BridgeError, Precondition, Result};

/// Platform resources required by the embedded runtime.
///
/// Immutable once built. The host process owns it; the runtime only borrows it
/// through the registry for its entire lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    platform: String,
    data_dir: PathBuf,
    cache_dir: Option<PathBuf>,
    asset_root: Option<PathBuf>,
}

impl ExecutionContext {
    pub fn builder(platform: impl Into<String>, data_dir: impl Into<PathBuf>) -> ExecutionContextBuilder {
        ExecutionContextBuilder {
            context: ExecutionContext {
                platform: platform.into(),
                data_dir: data_dir.into(),
                cache_dir: None,
                asset_root: None,
            },
        }
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Private, persistent storage for the runtime.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Scratch storage, falling back to the data directory when the platform has none.
    pub fn cache_dir(&self) -> &Path {
        self.cache_dir.as_deref().unwrap_or(&self.data_dir)
    }

    pub fn asset_root(&self) -> Option<&Path> {
        self.asset_root.as_deref()
    }
}

/// Builder for [`ExecutionContext`], from [`ExecutionContext::builder`].
pub struct ExecutionContextBuilder {
    context: ExecutionContext,
}

impl ExecutionContextBuilder {
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.context.cache_dir = Some(dir.into());
        self
    }

    pub fn asset_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.context.asset_root = Some(dir.into());
        self
    }

    pub fn build(self) -> ExecutionContext {
        self.context
    }
}

/// Write-once holder for the [`ExecutionContext`].
///
/// Registration must happen on the host's own initialization path, before the
/// embedded view becomes visible. Reads after that need no locking.
#[derive(Debug, Default)]
pub struct RuntimeContextRegistry {
    context: OnceCell<Arc<ExecutionContext>>,
}

static GLOBAL: Lazy<Arc<RuntimeContextRegistry>> = Lazy::new(|| Arc::new(RuntimeContextRegistry::new()));

impl RuntimeContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by the platform entry points.
    ///
    /// Library code should receive a registry explicitly instead of reaching for
    /// this one.
    pub fn global() -> Arc<RuntimeContextRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Publishes `context` to the embedded runtime.
    ///
    /// A second registration is a programmer error: the first context stays in
    /// place and [`Precondition::ContextAlreadyRegistered`] is returned.
    pub fn register(&self, context: ExecutionContext) -> Result<Arc<ExecutionContext>> {
        let context = Arc::new(context);
        match self.context.try_insert(Arc::clone(&context)) {
            Ok(_) => {
                tracing::info!(
                    platform = context.platform(),
                    data_dir = %context.data_dir().display(),
                    "Execution context registered"
                );
                Ok(context)
            }
            Err(_) => {
                tracing::error!("Execution context registered more than once");
                Err(BridgeError::PreconditionViolation(
                    Precondition::ContextAlreadyRegistered,
                ))
            }
        }
    }

    pub fn get(&self) -> Option<Arc<ExecutionContext>> {
        self.context.get().cloned()
    }

    pub fn is_registered(&self) -> bool {
        self.context.get().is_some()
    }

    /// Returns the registered context, or the precondition violation every
    /// embedded-runtime call must surface when there is none.
    pub fn require(&self) -> Result<Arc<ExecutionContext>> {
        self.get().ok_or(BridgeError::PreconditionViolation(
            Precondition::ContextNotRegistered,
        ))
    }
}
