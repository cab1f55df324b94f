//! Per-extension facade binding native methods into the bridge.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use trestle_common::protocol::error::{BridgeError, Result};

use crate::binding::{BindingTable, MethodSignature};
use crate::callback::Argument;
use crate::registry::CallbackRegistry;

/// The runtime object binding one extension's methods into the bridge for
/// one script context.
///
/// Each connection owns its binding table and callback registry, so
/// independent connections cannot cross-talk and teardown is local: closing
/// drops all bindings and releases every pending handle.
pub struct Connection {
    extension: String,
    bindings: BindingTable,
    registry: Arc<CallbackRegistry>,
    closed: AtomicBool,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("extension", &self.extension)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Connection {
    pub(crate) fn new(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        let registry = Arc::new(CallbackRegistry::new(extension.clone()));
        Connection {
            extension,
            bindings: BindingTable::new(),
            registry,
            closed: AtomicBool::new(false),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Bind a native handler under `method`.
    ///
    /// The handler receives decoded values and synthesized callbacks in the
    /// signature's parameter order. Binding the same name twice fails with
    /// [`BridgeError::DuplicateBinding`].
    pub fn bind<F>(&self, method: &str, signature: MethodSignature, handler: F) -> Result<()>
    where
        F: Fn(Vec<Argument>) -> Result<()> + Send + Sync + 'static,
    {
        if self.is_closed() {
            return Err(BridgeError::NotFound(self.extension.clone()));
        }

        self.bindings.register(method, signature, Arc::new(handler))?;
        tracing::info!(extension = %self.extension, method = %method, "bound method");
        Ok(())
    }

    /// Tear down this connection: drop all bindings and release every
    /// pending callback handle. Idempotent.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let bindings = self.bindings.clear();
        let handles = self.registry.release_all();
        tracing::info!(
            extension = %self.extension,
            bindings,
            handles,
            "connection closed"
        );
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub(crate) fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }
}
