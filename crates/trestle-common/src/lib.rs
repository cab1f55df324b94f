//! Trestle Common Types and Transport
//!
//! This crate provides the value model, protocol definitions and transport
//! primitives for the Trestle bridge, the typed marshaling and
//! callback-correlation engine that lets a native host expose methods to a
//! script execution context.
//!
//! # Overview
//!
//! Everything that crosses the native/script boundary is expressed in a
//! closed, recursive value union; calls and callback resolutions travel as
//! two small message kinds serializable to that union. This crate contains
//! the shared pieces used on both sides of the boundary:
//!
//! - **Value Model**: the closed [`Value`] union (primitives, ordered
//!   lists, string-keyed maps, records encoded as maps)
//! - **Codec**: native↔encoded conversion and shape-directed decoding
//! - **Protocol Layer**: [`CallMessage`], [`CallbackMessage`], the tagged
//!   [`Message`] envelope and the [`BridgeError`] taxonomy
//! - **Transport Layer**: the [`transport::MessageSink`] delivery trait,
//!   a JSON wire codec and an in-memory transport
//!
//! # Example
//!
//! ```
//! use trestle_common::codec::{self, Shape};
//! use trestle_common::value::Value;
//!
//! let encoded = codec::to_value(&vec!["one", "two", "three"]).unwrap();
//! let decoded = codec::decode(&encoded, &Shape::list(Shape::Text)).unwrap();
//!
//! assert_eq!(
//!     decoded,
//!     Value::List(vec![
//!         Value::Text("one".into()),
//!         Value::Text("two".into()),
//!         Value::Text("three".into()),
//!     ])
//! );
//! ```

pub mod codec;
pub mod protocol;
pub mod transport;
pub mod value;

pub use codec::{Field, Shape};
pub use protocol::{BridgeError, CallMessage, CallbackMessage, Message, Result};
pub use value::Value;
