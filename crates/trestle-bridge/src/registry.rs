//! Callback handle lifecycle: issuance, firing, release.
//!
//! Every completion parameter of an inbound call is stood in for by a
//! freshly minted handle. The registry owns each handle from issuance until
//! it is resolved:
//!
//! ```text
//! pending ──fire──▶ fired      (terminal, arguments delivered once)
//! pending ──release──▶ released (terminal, no value ever delivered)
//! ```
//!
//! There is no transition out of `fired` or `released`; a second resolution
//! attempt is [`BridgeError::UnknownHandle`], a protocol violation rather
//! than a silent no-op. Handles are never reused for the lifetime of the
//! owning connection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use trestle_common::codec::{self, Shape};
use trestle_common::protocol::error::{BridgeError, Result};
use trestle_common::protocol::CallbackMessage;
use trestle_common::value::Value;

/// Opaque correlation token standing in for a script-side completion
/// function between issuance and firing.
pub type CallbackHandle = String;

struct PendingCallback {
    kinds: Vec<Shape>,
}

/// Tracks the liveness of every callback handle issued for one connection.
///
/// All state mutation happens under a mutex scoped to the single operation;
/// the lock is never held across a handler invocation, so handlers may fire
/// callbacks synchronously during dispatch or later from any thread.
pub struct CallbackRegistry {
    /// Extension-scoped prefix baked into minted handles.
    scope: String,
    next_id: AtomicU64,
    pending: Mutex<HashMap<CallbackHandle, PendingCallback>>,
}

impl CallbackRegistry {
    pub fn new(scope: impl Into<String>) -> Self {
        CallbackRegistry {
            scope: scope.into(),
            next_id: AtomicU64::new(0),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Mint a fresh handle and record it as pending, remembering the
    /// declared argument kinds it must be fired with.
    pub fn issue(&self, kinds: &[Shape]) -> CallbackHandle {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let handle = format!("{}-cb-{}", self.scope, id);

        self.pending
            .lock()
            .unwrap()
            .insert(handle.clone(), PendingCallback { kinds: kinds.to_vec() });

        tracing::debug!(handle = %handle, arity = kinds.len(), "issued callback handle");
        handle
    }

    /// Resolve a pending handle with its arguments, producing the
    /// correlated message to emit.
    ///
    /// Arity and per-argument kinds are validated against what was declared
    /// at issuance; a failed validation leaves the handle pending. On
    /// success the handle transitions to fired and can never be resolved
    /// again.
    pub fn fire(&self, handle: &str, args: Vec<Value>) -> Result<CallbackMessage> {
        let mut pending = self.pending.lock().unwrap();

        let entry = pending
            .get(handle)
            .ok_or_else(|| BridgeError::UnknownHandle(handle.to_string()))?;

        if args.len() != entry.kinds.len() {
            return Err(BridgeError::ArgumentCountMismatch {
                expected: entry.kinds.len(),
                actual: args.len(),
            });
        }

        for (position, (arg, kind)) in args.iter().zip(&entry.kinds).enumerate() {
            codec::check(arg, kind).map_err(|err| match err {
                BridgeError::TypeMismatch(msg) => BridgeError::TypeMismatch(format!(
                    "callback argument {}: {}",
                    position, msg
                )),
                other => other,
            })?;
        }

        pending.remove(handle);
        tracing::debug!(handle = %handle, args = args.len(), "callback fired");

        Ok(CallbackMessage::new(handle, args))
    }

    /// Tear down a pending handle without firing it.
    ///
    /// Used when the owning call context is discarded; a later `fire` on
    /// the same handle is [`BridgeError::UnknownHandle`].
    pub fn release(&self, handle: &str) -> Result<()> {
        let removed = self.pending.lock().unwrap().remove(handle);
        match removed {
            Some(_) => {
                tracing::debug!(handle = %handle, "callback handle released");
                Ok(())
            }
            None => Err(BridgeError::UnknownHandle(handle.to_string())),
        }
    }

    /// Release every pending handle, returning how many were dropped.
    /// Used at connection teardown.
    pub fn release_all(&self) -> usize {
        let mut pending = self.pending.lock().unwrap();
        let dropped = pending.len();
        pending.clear();
        if dropped > 0 {
            tracing::debug!(scope = %self.scope, dropped, "released all pending callback handles");
        }
        dropped
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_handles_are_unique() {
        let registry = CallbackRegistry::new("callbackTestExtension");
        let a = registry.issue(&[Shape::Int]);
        let b = registry.issue(&[Shape::Int]);

        assert_ne!(a, b);
        assert_eq!(registry.pending_count(), 2);
    }

    #[test]
    fn test_fire_produces_correlated_message() {
        let registry = CallbackRegistry::new("ext");
        let handle = registry.issue(&[Shape::Int, Shape::Text]);

        let message = registry
            .fire(&handle, vec![Value::Number(777.0), Value::Text("ok".into())])
            .unwrap();

        assert_eq!(message.handle, handle);
        assert_eq!(
            message.args,
            vec![Value::Number(777.0), Value::Text("ok".into())]
        );
        assert_eq!(registry.pending_count(), 0);
    }

    #[test]
    fn test_fire_is_exactly_once() {
        let registry = CallbackRegistry::new("ext");
        let handle = registry.issue(&[Shape::Int]);

        registry.fire(&handle, vec![Value::Number(1.0)]).unwrap();
        let err = registry.fire(&handle, vec![Value::Number(2.0)]).unwrap_err();

        assert!(matches!(err, BridgeError::UnknownHandle(_)), "got {:?}", err);
    }

    #[test]
    fn test_release_then_fire_is_unknown_handle() {
        let registry = CallbackRegistry::new("ext");
        let handle = registry.issue(&[Shape::Int]);

        registry.release(&handle).unwrap();
        let err = registry.fire(&handle, vec![Value::Number(1.0)]).unwrap_err();

        assert!(matches!(err, BridgeError::UnknownHandle(_)), "got {:?}", err);
    }

    #[test]
    fn test_release_after_fire_is_unknown_handle() {
        let registry = CallbackRegistry::new("ext");
        let handle = registry.issue(&[Shape::Int]);

        registry.fire(&handle, vec![Value::Number(1.0)]).unwrap();
        let err = registry.release(&handle).unwrap_err();

        assert!(matches!(err, BridgeError::UnknownHandle(_)), "got {:?}", err);
    }

    #[test]
    fn test_fire_with_never_issued_handle() {
        let registry = CallbackRegistry::new("ext");
        let err = registry.fire("ext-cb-999", vec![]).unwrap_err();
        assert!(matches!(err, BridgeError::UnknownHandle(_)), "got {:?}", err);
    }

    #[test]
    fn test_fire_validates_arity() {
        let registry = CallbackRegistry::new("ext");
        let handle = registry.issue(&[Shape::Int, Shape::Text]);

        let err = registry.fire(&handle, vec![Value::Number(1.0)]).unwrap_err();
        assert!(
            matches!(err, BridgeError::ArgumentCountMismatch { expected: 2, actual: 1 }),
            "got {:?}",
            err
        );
        // failed resolution leaves the handle pending
        assert_eq!(registry.pending_count(), 1);
    }

    #[test]
    fn test_failed_validation_leaves_handle_pending() {
        let registry = CallbackRegistry::new("ext");
        let handle = registry.issue(&[Shape::Int]);

        let err = registry
            .fire(&handle, vec![Value::Text("not a number".into())])
            .unwrap_err();
        assert!(matches!(err, BridgeError::TypeMismatch(_)), "got {:?}", err);

        registry.fire(&handle, vec![Value::Number(6.0)]).unwrap();
    }

    #[test]
    fn test_release_all_sweeps_pending_handles() {
        let registry = CallbackRegistry::new("ext");
        let a = registry.issue(&[Shape::Int]);
        let b = registry.issue(&[Shape::Int]);
        registry.fire(&a, vec![Value::Number(1.0)]).unwrap();

        assert_eq!(registry.release_all(), 1);
        assert_eq!(registry.pending_count(), 0);

        let err = registry.fire(&b, vec![Value::Number(2.0)]).unwrap_err();
        assert!(matches!(err, BridgeError::UnknownHandle(_)), "got {:?}", err);
    }
}
