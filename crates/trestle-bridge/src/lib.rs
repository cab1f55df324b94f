//! Trestle Bridge Engine
//!
//! This crate provides the execution side of the Trestle bridge: the
//! binding table, callback registry, dispatcher and per-extension
//! connection facade that together let a native host expose methods to a
//! script context and complete them through typed, exactly-once callbacks.
//!
//! # Overview
//!
//! A host creates one [`Bridge`] per script context, adds a [`Connection`]
//! per extension object and binds each method with its declared
//! [`MethodSignature`]. When an inbound call names a method whose signature
//! carries a callback role, the dispatcher substitutes a synthesized
//! [`Callback`] for that parameter; invoking it is the only way a callback
//! message is emitted, and the registry guarantees each handle resolves at
//! most once.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trestle_bridge::{Bridge, MethodSignature, ParamRole};
//! use trestle_common::codec::Shape;
//! use trestle_common::transport::MemoryTransport;
//! use trestle_common::{CallMessage, Message, Value};
//!
//! let sink = Arc::new(MemoryTransport::new());
//! let bridge = Bridge::new(sink.clone());
//!
//! let connection = bridge.add_connection("callbackTestExtension").unwrap();
//! connection
//!     .bind(
//!         "callbackWithSinglePrimitiveParam",
//!         MethodSignature::new(vec![ParamRole::Callback(vec![Shape::Int])]),
//!         |mut args| {
//!             let completion = args.remove(0).into_callback()?;
//!             completion.invoke(vec![Value::Number(777.0)])
//!         },
//!     )
//!     .unwrap();
//!
//! bridge
//!     .receive(Message::Call(CallMessage::new(
//!         "callbackTestExtension",
//!         "callbackWithSinglePrimitiveParam",
//!         vec![Value::Text("promise-0".into())],
//!     )))
//!     .unwrap();
//!
//! match sink.pop().unwrap() {
//!     Message::Callback(message) => assert_eq!(message.args, vec![Value::Number(777.0)]),
//!     other => panic!("unexpected message: {:?}", other),
//! }
//! ```

pub mod binding;
pub mod callback;
pub mod connection;
pub mod dispatcher;
pub mod host;
pub mod registry;

pub use binding::{BindingEntry, BindingTable, MethodHandler, MethodSignature, ParamRole};
pub use callback::{Argument, Callback};
pub use connection::Connection;
pub use dispatcher::Dispatcher;
pub use host::Bridge;
pub use registry::{CallbackHandle, CallbackRegistry};
