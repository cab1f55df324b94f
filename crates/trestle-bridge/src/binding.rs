//! Method signatures and the per-connection binding table.
//!
//! A host registers each extension method once, with a declared signature;
//! the table maps the method name to its handler for the lifetime of the
//! owning connection. Lookup is exact-match and there is no overloading:
//! each bound name maps to exactly one signature.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use trestle_common::codec::Shape;
use trestle_common::protocol::error::{BridgeError, Result};

use crate::callback::Argument;

/// Role of one positional parameter in a bound method.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamRole {
    /// A plain argument, decoded against the declared shape before the
    /// handler runs.
    Value(Shape),
    /// A completion handler. The declared kinds describe the arguments the
    /// native side will supply when it fires, in order.
    Callback(Vec<Shape>),
}

/// Ordered parameter roles of one bound method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub params: Vec<ParamRole>,
}

impl MethodSignature {
    pub fn new(params: Vec<ParamRole>) -> Self {
        MethodSignature { params }
    }

    /// Number of positional slots an inbound call must supply.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Native handler invoked with decoded values and synthesized callbacks in
/// original parameter order.
pub type MethodHandler = Arc<dyn Fn(Vec<Argument>) -> Result<()> + Send + Sync>;

/// A registered method: its signature and the handler to invoke.
#[derive(Clone)]
pub struct BindingEntry {
    pub signature: Arc<MethodSignature>,
    pub handler: MethodHandler,
}

/// Name → handler table for one connection.
///
/// Entries are immutable once registered and dropped only at connection
/// teardown. Mutations and lookups each take the lock for the scope of the
/// single operation; handlers are cloned out so no lock is held while one
/// runs.
#[derive(Default)]
pub struct BindingTable {
    entries: RwLock<HashMap<String, BindingEntry>>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method. Fails with [`BridgeError::DuplicateBinding`] if
    /// the name is already bound on this table.
    pub fn register(
        &self,
        method: &str,
        signature: MethodSignature,
        handler: MethodHandler,
    ) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        if entries.contains_key(method) {
            return Err(BridgeError::DuplicateBinding(method.to_string()));
        }
        entries.insert(
            method.to_string(),
            BindingEntry { signature: Arc::new(signature), handler },
        );
        Ok(())
    }

    /// Exact-match lookup, cloning the entry out of the lock scope.
    pub fn resolve(&self, method: &str) -> Option<BindingEntry> {
        self.entries.read().unwrap().get(method).cloned()
    }

    /// Drop all bindings, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write().unwrap();
        let removed = entries.len();
        entries.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_handler() -> MethodHandler {
        Arc::new(|_args| Ok(()))
    }

    #[test]
    fn test_register_and_resolve() {
        let table = BindingTable::new();
        table
            .register(
                "ready",
                MethodSignature::new(vec![]),
                noop_handler(),
            )
            .unwrap();

        let entry = table.resolve("ready").expect("binding should resolve");
        assert_eq!(entry.signature.arity(), 0);
        assert!(table.resolve("notBound").is_none());
    }

    #[test]
    fn test_duplicate_binding_is_rejected() {
        let table = BindingTable::new();
        let signature = || MethodSignature::new(vec![ParamRole::Value(Shape::Int)]);

        table.register("testsCompleted", signature(), noop_handler()).unwrap();
        let err = table
            .register("testsCompleted", signature(), noop_handler())
            .unwrap_err();

        assert!(matches!(err, BridgeError::DuplicateBinding(_)), "got {:?}", err);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_clear_drops_all_bindings() {
        let table = BindingTable::new();
        table.register("a", MethodSignature::new(vec![]), noop_handler()).unwrap();
        table.register("b", MethodSignature::new(vec![]), noop_handler()).unwrap();

        assert_eq!(table.clear(), 2);
        assert!(table.is_empty());
        assert!(table.resolve("a").is_none());
    }

    #[test]
    fn test_signature_arity_counts_all_roles() {
        let signature = MethodSignature::new(vec![
            ParamRole::Value(Shape::Text),
            ParamRole::Callback(vec![Shape::Int, Shape::Text]),
        ]);
        assert_eq!(signature.arity(), 2);
    }
}
