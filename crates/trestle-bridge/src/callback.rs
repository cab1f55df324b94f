//! The synthesized invocable handed to native handlers in place of
//! function-typed parameters.
//!
//! A [`Callback`] closes over its minted handle, the owning registry and
//! the outbound sink; invoking it is the only way a callback message is
//! emitted, so raw correlation ids never reach handler authors. The closure
//! capture follows the same pattern the registry state itself uses: shared
//! `Arc`s, no pointer smuggling.

use std::fmt;
use std::sync::Arc;

use trestle_common::protocol::error::{BridgeError, Result};
use trestle_common::protocol::Message;
use trestle_common::transport::MessageSink;
use trestle_common::value::Value;

use crate::registry::{CallbackHandle, CallbackRegistry};

/// Completion callback bound to a single pending handle.
///
/// Cloneable and callable from any thread; the exactly-once contract is
/// enforced by the registry, not by ownership, so a handler may stash a
/// clone and fire it after dispatch has returned.
#[derive(Clone)]
pub struct Callback {
    handle: CallbackHandle,
    registry: Arc<CallbackRegistry>,
    sink: Arc<dyn MessageSink>,
}

impl Callback {
    pub(crate) fn new(
        handle: CallbackHandle,
        registry: Arc<CallbackRegistry>,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        Callback { handle, registry, sink }
    }

    /// Fire the callback with its arguments, in the order the script side
    /// should observe them.
    ///
    /// Validates the arguments against the kinds declared in the method
    /// signature, transitions the handle to fired and emits the correlated
    /// [`CallbackMessage`](trestle_common::protocol::CallbackMessage)
    /// outward. A second invocation is
    /// [`BridgeError::UnknownHandle`](trestle_common::BridgeError::UnknownHandle).
    pub fn invoke(&self, args: Vec<Value>) -> Result<()> {
        let message = self.registry.fire(&self.handle, args)?;
        self.sink.deliver(Message::Callback(message))
    }

    /// Tear down the handle without ever firing it.
    pub fn release(&self) -> Result<()> {
        self.registry.release(&self.handle)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").field("handle", &self.handle).finish()
    }
}

/// One positional argument delivered to a bound method handler.
#[derive(Debug)]
pub enum Argument {
    /// A plain value, already decoded against the declared shape.
    Value(Value),
    /// A synthesized completion callback.
    Callback(Callback),
}

impl Argument {
    pub fn into_value(self) -> Result<Value> {
        match self {
            Argument::Value(value) => Ok(value),
            Argument::Callback(_) => Err(BridgeError::TypeMismatch(
                "expected a value argument, found a callback".into(),
            )),
        }
    }

    pub fn into_callback(self) -> Result<Callback> {
        match self {
            Argument::Callback(callback) => Ok(callback),
            Argument::Value(value) => Err(BridgeError::TypeMismatch(format!(
                "expected a callback argument, found {}",
                value.kind()
            ))),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Argument::Value(value) => Some(value),
            Argument::Callback(_) => None,
        }
    }
}
