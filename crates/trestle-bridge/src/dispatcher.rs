//! Inbound call orchestration and outbound broadcast.
//!
//! The dispatcher walks a call message against the resolved signature:
//! value roles decode their positional argument, callback roles mint a
//! handle and synthesize the invocable the handler will complete through.
//! All table and registry locks are released before the handler runs, so
//! handler bodies may take arbitrarily long or re-enter the dispatcher.

use std::sync::Arc;

use trestle_common::codec;
use trestle_common::protocol::error::{BridgeError, Result};
use trestle_common::protocol::{CallMessage, Message};
use trestle_common::transport::MessageSink;
use trestle_common::value::Value;

use crate::binding::ParamRole;
use crate::callback::{Argument, Callback};
use crate::connection::Connection;

pub struct Dispatcher {
    sink: Arc<dyn MessageSink>,
}

impl Dispatcher {
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Dispatcher { sink }
    }

    /// Dispatch one inbound call against a resolved connection.
    ///
    /// Failures (`NotFound`, `ArgumentCountMismatch`, `TypeMismatch`) abort
    /// only this call; they are returned to the caller and never disturb
    /// other in-flight calls or pending handles.
    pub fn dispatch(&self, connection: &Connection, message: &CallMessage) -> Result<()> {
        tracing::debug!(
            extension = %message.extension,
            method = %message.method,
            args = message.args.len(),
            "dispatching call"
        );

        let entry = connection.bindings().resolve(&message.method).ok_or_else(|| {
            BridgeError::NotFound(format!("{}.{}", message.extension, message.method))
        })?;

        let signature = entry.signature.clone();
        if message.args.len() < signature.arity() {
            return Err(BridgeError::ArgumentCountMismatch {
                expected: signature.arity(),
                actual: message.args.len(),
            });
        }

        // Extra trailing args beyond the declared roles are ignored,
        // mirroring the unknown-record-key rule.
        let mut call_args = Vec::with_capacity(signature.arity());
        for (position, role) in signature.params.iter().enumerate() {
            match role {
                ParamRole::Value(shape) => {
                    let value = codec::decode(&message.args[position], shape).map_err(|err| {
                        match err {
                            BridgeError::TypeMismatch(msg) => BridgeError::TypeMismatch(
                                format!("argument {}: {}", position, msg),
                            ),
                            other => other,
                        }
                    })?;
                    call_args.push(Argument::Value(value));
                }
                ParamRole::Callback(kinds) => {
                    // The supplied slot value is the script side's own
                    // correlation token; it is consumed, not decoded.
                    let handle = connection.registry().issue(kinds);
                    call_args.push(Argument::Callback(Callback::new(
                        handle,
                        connection.registry().clone(),
                        self.sink.clone(),
                    )));
                }
            }
        }

        (entry.handler)(call_args)
    }

    /// Broadcast path: native → script, no return path and no handle.
    pub fn broadcast(&self, extension: &str, method: &str, payload: Vec<Value>) -> Result<()> {
        tracing::debug!(extension = %extension, method = %method, args = payload.len(), "broadcasting");
        self.sink
            .deliver(Message::Call(CallMessage::new(extension, method, payload)))
    }
}
