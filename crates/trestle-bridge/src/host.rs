//! The bridge host: owns connections and routes messages.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use trestle_common::protocol::error::{BridgeError, Result};
use trestle_common::protocol::{CallMessage, Message};
use trestle_common::transport::MessageSink;
use trestle_common::value::Value;

use crate::connection::Connection;
use crate::dispatcher::Dispatcher;

/// Host-side entry point of the bridge.
///
/// A host constructs one `Bridge` per script context, handing it the sink
/// the hosting layer delivers outbound messages through, then registers one
/// connection per extension object. Inbound messages from the script side
/// are fed through [`Bridge::receive`].
pub struct Bridge {
    connections: RwLock<HashMap<String, Arc<Connection>>>,
    dispatcher: Dispatcher,
}

impl Bridge {
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Bridge {
            connections: RwLock::new(HashMap::new()),
            dispatcher: Dispatcher::new(sink),
        }
    }

    /// Create the connection exposing `extension` to the script context.
    ///
    /// Fails with [`BridgeError::DuplicateBinding`] if the extension name is
    /// already taken on this bridge.
    pub fn add_connection(&self, extension: &str) -> Result<Arc<Connection>> {
        let mut connections = self.connections.write().unwrap();
        if connections.contains_key(extension) {
            return Err(BridgeError::DuplicateBinding(extension.to_string()));
        }

        let connection = Arc::new(Connection::new(extension));
        connections.insert(extension.to_string(), connection.clone());
        tracing::info!(extension = %extension, "connection added");
        Ok(connection)
    }

    pub fn connection(&self, extension: &str) -> Option<Arc<Connection>> {
        self.connections.read().unwrap().get(extension).cloned()
    }

    /// Tear down and remove one connection: its bindings are dropped and
    /// its pending callback handles released.
    pub fn remove_connection(&self, extension: &str) -> Result<()> {
        let removed = self.connections.write().unwrap().remove(extension);
        match removed {
            Some(connection) => {
                connection.close();
                Ok(())
            }
            None => Err(BridgeError::NotFound(extension.to_string())),
        }
    }

    /// Inbound entry point fed by the hosting layer.
    ///
    /// Calls dispatch to the bound handler. A stray inbound callback is a
    /// protocol violation: this engine mints handles natively and resolves
    /// them natively, so no inbound message can legitimately carry one.
    pub fn receive(&self, message: Message) -> Result<()> {
        match message {
            Message::Call(call) => self.dispatch_call(&call),
            Message::Callback(callback) => {
                tracing::warn!(handle = %callback.handle, "inbound callback for natively owned handle");
                Err(BridgeError::UnknownHandle(callback.handle))
            }
        }
    }

    /// Dispatch one inbound call message.
    pub fn dispatch_call(&self, message: &CallMessage) -> Result<()> {
        let connection = self
            .connection(&message.extension)
            .ok_or_else(|| BridgeError::NotFound(message.extension.clone()))?;
        self.dispatcher.dispatch(&connection, message)
    }

    /// Broadcast a call into the script context: no return path, no handle.
    pub fn broadcast(&self, extension: &str, method: &str, payload: Vec<Value>) -> Result<()> {
        self.dispatcher.broadcast(extension, method, payload)
    }
}
